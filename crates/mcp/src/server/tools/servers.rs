use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, ErrorData};
use rmcp::{tool, tool_router};

use crate::actions::{CreateServer, DeleteServer, ExecuteRequest, RebootServer, RestartService};
use crate::server::core::ForgeMcpCore;
use crate::server::schemas::{DaemonRequest, ServerRequest};

#[tool_router(router = server_tools, vis = "pub(crate)")]
impl ForgeMcpCore {
    #[tool(
        description = "List every server in the Forge account.",
        annotations(title = "List Servers", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn list_servers(&self) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch("/servers").await)
    }

    #[tool(
        description = "Get one server. Input: serverId.",
        annotations(title = "Show Server", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn show_server(&self, param: Parameters<ServerRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch(param.0.endpoint()).await)
    }

    #[tool(
        description = "List the background daemons of a server.",
        annotations(title = "List Daemons", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn list_daemons(&self, param: Parameters<ServerRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch(format!("{}/daemons", param.0.endpoint())).await)
    }

    #[tool(
        description = "Get one daemon of a server.",
        annotations(title = "Show Daemon", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn show_daemon(&self, param: Parameters<DaemonRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch(format!("/servers/{}/daemons/{}", param.0.server_id, param.0.daemon_id)).await)
    }

    #[tool(
        description = "List the PHP versions installed on a server. Use these for confirm_change_site_php_version.",
        annotations(title = "List PHP Versions", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn list_php_versions(&self, param: Parameters<ServerRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch(format!("{}/php", param.0.endpoint())).await)
    }

    #[tool(
        description = "Step 1 of 2: propose to create a new server with a cloud provider. Returns a summary, a confirmationId and the execute tool to call. Changes nothing. Show the summary to the user and continue with create_server only after an explicit yes.",
        annotations(title = "Confirm Create Server", read_only_hint = false, destructive_hint = false, open_world_hint = false)
    )]
    async fn confirm_server_creation(&self, param: Parameters<CreateServer>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.server_creation.propose(param.0))
    }

    #[tool(
        description = "Step 2 of 2: create a new server with a cloud provider. Requires the confirmationId from confirm_server_creation, issued after the user approved its summary. Every other parameter must equal the proposal or nothing is performed.",
        annotations(title = "Create Server", read_only_hint = false, destructive_hint = false, open_world_hint = true)
    )]
    async fn create_server(&self, param: Parameters<ExecuteRequest<CreateServer>>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.server_creation.execute(&self.services.client, param.0).await)
    }

    #[tool(
        description = "Step 1 of 2: propose to reboot a server. Returns a summary, a confirmationId and the execute tool to call. Changes nothing. Show the summary to the user and continue with reboot_server only after an explicit yes.",
        annotations(title = "Confirm Reboot Server", read_only_hint = false, destructive_hint = false, open_world_hint = false)
    )]
    async fn confirm_server_reboot(&self, param: Parameters<RebootServer>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.server_reboot.propose(param.0))
    }

    #[tool(
        description = "Step 2 of 2: reboot a server. Requires the confirmationId from confirm_server_reboot, issued after the user approved its summary. Every other parameter must equal the proposal or nothing is performed.",
        annotations(title = "Reboot Server", read_only_hint = false, destructive_hint = false, open_world_hint = true)
    )]
    async fn reboot_server(&self, param: Parameters<ExecuteRequest<RebootServer>>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.server_reboot.execute(&self.services.client, param.0).await)
    }

    #[tool(
        description = "Step 1 of 2: propose to restart nginx, php, mysql or postgres on a server. Returns a summary, a confirmationId and the execute tool to call. Changes nothing. Show the summary to the user and continue with restart_service only after an explicit yes.",
        annotations(title = "Confirm Restart Service", read_only_hint = false, destructive_hint = false, open_world_hint = false)
    )]
    async fn confirm_service_restart(&self, param: Parameters<RestartService>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.service_restart.propose(param.0))
    }

    #[tool(
        description = "Step 2 of 2: restart nginx, php, mysql or postgres on a server. Requires the confirmationId from confirm_service_restart, issued after the user approved its summary. Every other parameter must equal the proposal or nothing is performed.",
        annotations(title = "Restart Service", read_only_hint = false, destructive_hint = false, open_world_hint = true)
    )]
    async fn restart_service(&self, param: Parameters<ExecuteRequest<RestartService>>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.service_restart.execute(&self.services.client, param.0).await)
    }

    #[tool(
        description = "Step 1 of 2: propose to permanently delete a server and everything on it. Returns a summary, a confirmationId and the execute tool to call. Changes nothing. Show the summary to the user and continue with delete_server only after an explicit yes.",
        annotations(title = "Confirm Delete Server", read_only_hint = false, destructive_hint = true, open_world_hint = false)
    )]
    async fn confirm_server_deletion(&self, param: Parameters<DeleteServer>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.server_deletion.propose(param.0))
    }

    #[tool(
        description = "Step 2 of 2: permanently delete a server and everything on it. Requires the confirmationId from confirm_server_deletion, issued after the user approved its summary. Every other parameter must equal the proposal or nothing is performed.",
        annotations(title = "Delete Server", read_only_hint = false, destructive_hint = true, open_world_hint = true)
    )]
    async fn delete_server(&self, param: Parameters<ExecuteRequest<DeleteServer>>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.server_deletion.execute(&self.services.client, param.0).await)
    }
}
