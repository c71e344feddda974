use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, ErrorData};
use rmcp::{tool, tool_router};

use crate::actions::{ExecuteRequest, InstallWordPress, UninstallWordPress};
use crate::server::core::ForgeMcpCore;

#[tool_router(router = wordpress_tools, vis = "pub(crate)")]
impl ForgeMcpCore {
    #[tool(
        description = "Step 1 of 2: propose to install WordPress on a site, recreating the site first unless createFreshSite is false. Returns a summary, a confirmationId and the execute tool to call. Changes nothing. Show the summary to the user and continue with install_wordpress only after an explicit yes.",
        annotations(title = "Confirm Install WordPress", read_only_hint = false, destructive_hint = false, open_world_hint = false)
    )]
    async fn confirm_install_wordpress(&self, param: Parameters<InstallWordPress>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.wordpress_install.propose(param.0))
    }

    #[tool(
        description = "Step 2 of 2: install WordPress on a site, recreating the site first unless createFreshSite is false. Requires the confirmationId from confirm_install_wordpress, issued after the user approved its summary. Every other parameter must equal the proposal or nothing is performed.",
        annotations(title = "Install WordPress", read_only_hint = false, destructive_hint = false, open_world_hint = true)
    )]
    async fn install_wordpress(&self, param: Parameters<ExecuteRequest<InstallWordPress>>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.wordpress_install.execute(&self.services.client, param.0).await)
    }

    #[tool(
        description = "Step 1 of 2: propose to remove WordPress from a site while keeping its database. Returns a summary, a confirmationId and the execute tool to call. Changes nothing. Show the summary to the user and continue with uninstall_wordpress only after an explicit yes.",
        annotations(title = "Confirm Uninstall WordPress", read_only_hint = false, destructive_hint = true, open_world_hint = false)
    )]
    async fn confirm_uninstall_wordpress(&self, param: Parameters<UninstallWordPress>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.wordpress_uninstall.propose(param.0))
    }

    #[tool(
        description = "Step 2 of 2: remove WordPress from a site while keeping its database. Requires the confirmationId from confirm_uninstall_wordpress, issued after the user approved its summary. Every other parameter must equal the proposal or nothing is performed.",
        annotations(title = "Uninstall WordPress", read_only_hint = false, destructive_hint = true, open_world_hint = true)
    )]
    async fn uninstall_wordpress(&self, param: Parameters<ExecuteRequest<UninstallWordPress>>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.wordpress_uninstall.execute(&self.services.client, param.0).await)
    }
}
