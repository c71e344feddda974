use rmcp::model::{CallToolResult, ErrorData};
use rmcp::{tool, tool_router};
use serde_json::json;

use crate::catalog::{DATABASE_TYPES, PROJECT_TYPES, PROVIDERS, STATIC_PHP_VERSIONS, UBUNTU_VERSIONS};
use crate::envelope;
use crate::server::core::ForgeMcpCore;

#[tool_router(router = catalog_tools, vis = "pub(crate)")]
impl ForgeMcpCore {
    #[tool(
        description = "List the server providers Forge supports. Static list.",
        annotations(title = "List Providers", read_only_hint = true, destructive_hint = false, open_world_hint = false)
    )]
    async fn list_providers(&self) -> Result<CallToolResult, ErrorData> {
        Ok(envelope::success(json!({ "providers": PROVIDERS })))
    }

    #[tool(
        description = "List database types for new servers. Static list.",
        annotations(title = "List Database Types", read_only_hint = true, destructive_hint = false, open_world_hint = false)
    )]
    async fn list_database_types(&self) -> Result<CallToolResult, ErrorData> {
        Ok(envelope::success(json!({ "databaseTypes": DATABASE_TYPES })))
    }

    #[tool(
        description = "List Ubuntu versions for new servers. 24.04 is the default. Static list.",
        annotations(title = "List Ubuntu Versions", read_only_hint = true, destructive_hint = false, open_world_hint = false)
    )]
    async fn list_ubuntu_versions(&self) -> Result<CallToolResult, ErrorData> {
        Ok(envelope::success(json!({ "ubuntuVersions": UBUNTU_VERSIONS })))
    }

    #[tool(
        description = "List PHP versions for new servers. Custom values are also accepted. Static list.",
        annotations(title = "List Static PHP Versions", read_only_hint = true, destructive_hint = false, open_world_hint = false)
    )]
    async fn list_static_php_versions(&self) -> Result<CallToolResult, ErrorData> {
        Ok(envelope::success(json!({ "phpVersions": STATIC_PHP_VERSIONS, "allowCustom": true })))
    }

    #[tool(
        description = "List site project types for confirm_site_creation. Static list.",
        annotations(title = "List Project Types", read_only_hint = true, destructive_hint = false, open_world_hint = false)
    )]
    async fn list_project_types(&self) -> Result<CallToolResult, ErrorData> {
        Ok(envelope::success(json!({ "projectTypes": PROJECT_TYPES })))
    }
}
