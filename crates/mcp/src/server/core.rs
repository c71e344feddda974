use std::sync::Arc;

use chrono::Utc;
use forge_gate_api::ForgeClient;
use forge_gate_util::redact_sensitive;
use indexmap::IndexMap;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, ErrorData, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo};
use rmcp::{ServerHandler, tool, tool_handler, tool_router};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::actions::ActionRegistry;
use crate::envelope;
use crate::server::categories::{ToolCategory, ToolCategorySet, categorize};
use crate::server::schemas::TestConnectionRequest;
use crate::types::ToolError;

const INSTRUCTIONS: &str = "Laravel Forge gateway.\n\
READ TOOLS (list_*, show_*, get_*, check_*) call Forge directly.\n\
MUTATING ACTIONS ARE TWO-PHASE:\n\
1) Call the confirm_* tool with the full parameters. It returns summary and confirmationId and changes nothing.\n\
2) Show the summary to the user verbatim and wait for an explicit yes.\n\
3) Call the execute tool named in executeTool with identical parameters plus confirmationId.\n\
A confirmationId works once, expires, and only matches the exact parameters it was issued for. \
A result with performed=false means nothing happened: propose again.\n\
Never call an execute tool without the user's approval of the matching summary.";

/// Shared services for tool handlers. One instance serves every session.
#[derive(Debug)]
pub struct ForgeServices {
    pub(crate) client: ForgeClient,
    pub(crate) actions: ActionRegistry,
}

impl ForgeServices {
    pub fn new(client: ForgeClient, actions: ActionRegistry) -> Self {
        Self { client, actions }
    }

    pub fn client(&self) -> &ForgeClient {
        &self.client
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.actions
    }
}

#[derive(Clone)]
pub struct ForgeMcpCore {
    tool_router: ToolRouter<Self>,
    pub(crate) services: Arc<ForgeServices>,
}

impl ForgeMcpCore {
    /// Build a handler exposing only the tools of the enabled categories.
    pub fn new(services: Arc<ForgeServices>, categories: ToolCategorySet) -> Self {
        let mut tool_router = Self::diagnostic_tools()
            + Self::account_tools()
            + Self::catalog_tools()
            + Self::server_tools()
            + Self::site_tools()
            + Self::deployment_tools()
            + Self::database_tools()
            + Self::certificate_tools()
            + Self::wordpress_tools()
            + Self::command_tools();
        for tool in tool_router.list_all() {
            let category = ToolCategory::of(&tool);
            if !categories.allows(category) {
                let name: &str = &tool.name;
                debug!(tool = name, %category, "tool disabled by category selection");
                tool_router.remove_route(name);
            }
        }
        Self { tool_router, services }
    }

    /// Registered tool names with their category, sorted by name.
    pub fn registered_tools(&self) -> IndexMap<String, ToolCategory> {
        categorize(&self.tool_router.list_all())
    }

    /// Run a read-only GET and wrap the outcome.
    pub(crate) async fn fetch(&self, endpoint: impl Into<String>) -> CallToolResult {
        self.fetch_with(endpoint, |payload| payload).await
    }

    /// Run a GET and reshape a successful payload before wrapping it.
    pub(crate) async fn fetch_with(&self, endpoint: impl Into<String>, shape: impl FnOnce(Value) -> Value) -> CallToolResult {
        match self.services.client.get(endpoint).await {
            Ok(payload) => envelope::success(shape(payload)),
            Err(error) => {
                let error = ToolError::from(error);
                warn!(code = error.code(), error = %redact_sensitive(&error.to_string()), "read tool failed");
                envelope::failure(&error)
            }
        }
    }
}

#[tool_router(router = diagnostic_tools, vis = "pub(crate)")]
impl ForgeMcpCore {
    #[tool(
        description = "Check that the gateway is reachable. Echoes the message with the current server time. Does not call Forge.",
        annotations(title = "Test Connection", read_only_hint = true, destructive_hint = false, open_world_hint = false)
    )]
    async fn test_connection(&self, param: Parameters<TestConnectionRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(envelope::success(json!({
            "message": param.0.message,
            "timestamp": Utc::now().to_rfc3339(),
        })))
    }
}

#[tool_handler]
impl ServerHandler for ForgeMcpCore {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            protocol_version: ProtocolVersion::LATEST,
            server_info: Implementation {
                name: "forge-gate".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Laravel Forge MCP".to_string()),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_gate_api::ForgeClientConfig;

    fn core(categories: ToolCategorySet) -> ForgeMcpCore {
        let client = ForgeClient::new(ForgeClientConfig::new("test-key")).unwrap();
        let services = Arc::new(ForgeServices::new(client, ActionRegistry::default()));
        ForgeMcpCore::new(services, categories)
    }

    #[test]
    fn readonly_selection_hides_every_mutating_tool() {
        let tools = core(ToolCategorySet::READONLY).registered_tools();
        assert!(tools.values().all(|category| *category == ToolCategory::Readonly));
        assert!(tools.contains_key("test_connection"));
        assert!(tools.contains_key("list_servers"));
        assert!(!tools.contains_key("confirm_server_creation"));
        assert!(!tools.contains_key("delete_server"));
    }

    #[test]
    fn write_selection_adds_pairs_but_not_destructive_ones() {
        let tools = core("write".parse().unwrap()).registered_tools();
        assert_eq!(tools.get("confirm_server_creation"), Some(&ToolCategory::Write));
        assert_eq!(tools.get("create_server"), Some(&ToolCategory::Write));
        assert!(!tools.contains_key("confirm_server_deletion"));
        assert!(!tools.contains_key("execute_site_command"));
    }

    #[test]
    fn propose_tools_share_the_category_of_their_execute_tool() {
        let tools = core(ToolCategorySet::ALL).registered_tools();
        let proposals: Vec<&String> = tools.keys().filter(|name| name.starts_with("confirm_")).collect();
        assert_eq!(proposals.len(), 25);
        for (propose, execute) in [
            ("confirm_server_deletion", "delete_server"),
            ("confirm_delete_database", "delete_database"),
            ("confirm_execute_site_command", "execute_site_command"),
            ("confirm_uninstall_wordpress", "uninstall_wordpress"),
            ("confirm_certificate_deletion", "delete_certificate"),
            ("confirm_site_deletion", "delete_site"),
            ("confirm_remove_site_git", "remove_site_git"),
            ("confirm_delete_database_user", "delete_database_user"),
        ] {
            assert_eq!(tools.get(propose), Some(&ToolCategory::Destructive), "{propose}");
            assert_eq!(tools.get(execute), Some(&ToolCategory::Destructive), "{execute}");
        }
        assert_eq!(tools.get("confirm_install_wordpress"), Some(&ToolCategory::Write));
    }

    #[test]
    fn catalog_tools_are_always_readonly() {
        let tools = core(ToolCategorySet::READONLY).registered_tools();
        for name in [
            "list_providers",
            "list_database_types",
            "list_ubuntu_versions",
            "list_static_php_versions",
            "list_project_types",
        ] {
            assert_eq!(tools.get(name), Some(&ToolCategory::Readonly), "{name}");
        }
    }
}
