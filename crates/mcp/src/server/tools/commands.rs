use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, ErrorData};
use rmcp::{tool, tool_router};

use crate::actions::{ExecuteRequest, ExecuteSiteCommand};
use crate::server::core::ForgeMcpCore;
use crate::server::schemas::{SiteCommandRequest, SiteRequest};

#[tool_router(router = command_tools, vis = "pub(crate)")]
impl ForgeMcpCore {
    #[tool(
        description = "List the commands run on a site.",
        annotations(title = "List Site Commands", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn list_site_commands(&self, param: Parameters<SiteRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch(format!("{}/commands", param.0.endpoint())).await)
    }

    #[tool(
        description = "Get the status and output of one site command.",
        annotations(title = "Get Site Command", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn get_site_command(&self, param: Parameters<SiteCommandRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch(format!("{}/commands/{}", param.0.site.endpoint(), param.0.command_id)).await)
    }

    #[tool(
        description = "Step 1 of 2: propose to run a shell command in the directory of a site. Returns a summary, a confirmationId and the execute tool to call. Changes nothing. Show the summary to the user and continue with execute_site_command only after an explicit yes.",
        annotations(title = "Confirm Execute Site Command", read_only_hint = false, destructive_hint = true, open_world_hint = false)
    )]
    async fn confirm_execute_site_command(&self, param: Parameters<ExecuteSiteCommand>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.site_command.propose(param.0))
    }

    #[tool(
        description = "Step 2 of 2: run a shell command in the directory of a site. Requires the confirmationId from confirm_execute_site_command, issued after the user approved its summary. Every other parameter must equal the proposal or nothing is performed.",
        annotations(title = "Execute Site Command", read_only_hint = false, destructive_hint = true, open_world_hint = true)
    )]
    async fn execute_site_command(&self, param: Parameters<ExecuteRequest<ExecuteSiteCommand>>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.site_command.execute(&self.services.client, param.0).await)
    }
}
