use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, ErrorData};
use rmcp::{tool, tool_router};

use crate::actions::{
    AddSiteAliases, ChangeSitePhpVersion, ClearSiteLog, CreateSite, DeleteSite, ExecuteRequest, InstallOrUpdateSiteGit, RemoveSiteGit,
};
use crate::server::core::ForgeMcpCore;
use crate::server::schemas::{ServerRequest, SiteRequest};

#[tool_router(router = site_tools, vis = "pub(crate)")]
impl ForgeMcpCore {
    #[tool(
        description = "List the sites of a server.",
        annotations(title = "List Sites", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn list_sites(&self, param: Parameters<ServerRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch(format!("{}/sites", param.0.endpoint())).await)
    }

    #[tool(
        description = "Get one site.",
        annotations(title = "Show Site", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn show_site(&self, param: Parameters<SiteRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch(param.0.endpoint()).await)
    }

    #[tool(
        description = "Get the .env file of a site as text.",
        annotations(title = "Get Site Environment", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn get_site_env(&self, param: Parameters<SiteRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch(format!("{}/env", param.0.endpoint())).await)
    }

    #[tool(
        description = "Get the application log of a site.",
        annotations(title = "Get Site Log", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn get_site_log(&self, param: Parameters<SiteRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch(format!("{}/logs", param.0.endpoint())).await)
    }

    #[tool(
        description = "Get the Composer package repository credentials configured for a site.",
        annotations(title = "Get Composer Packages Auth", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn get_composer_packages_auth(&self, param: Parameters<SiteRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch(format!("{}/packages", param.0.endpoint())).await)
    }

    #[tool(
        description = "Check whether a Laravel site is in maintenance mode.",
        annotations(title = "Check Laravel Maintenance Status", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn check_laravel_maintenance_status(&self, param: Parameters<SiteRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch(format!("{}/integrations/laravel-maintenance", param.0.endpoint())).await)
    }

    #[tool(
        description = "Check whether the Laravel scheduler integration is enabled for a site.",
        annotations(title = "Check Laravel Scheduler Status", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn check_laravel_scheduler_status(&self, param: Parameters<SiteRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch(format!("{}/integrations/laravel-scheduler", param.0.endpoint())).await)
    }

    #[tool(
        description = "Check whether the Laravel Pulse daemon integration is enabled for a site.",
        annotations(title = "Check Pulse Daemon Status", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn check_pulse_daemon_status(&self, param: Parameters<SiteRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch(format!("{}/integrations/pulse", param.0.endpoint())).await)
    }

    #[tool(
        description = "Check whether the Inertia SSR daemon integration is enabled for a site.",
        annotations(title = "Check Inertia Daemon Status", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn check_inertia_daemon_status(&self, param: Parameters<SiteRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch(format!("{}/integrations/inertia", param.0.endpoint())).await)
    }

    #[tool(
        description = "Step 1 of 2: propose to create a new site on a server. Returns a summary, a confirmationId and the execute tool to call. Changes nothing. Show the summary to the user and continue with create_site only after an explicit yes.",
        annotations(title = "Confirm Create Site", read_only_hint = false, destructive_hint = false, open_world_hint = false)
    )]
    async fn confirm_site_creation(&self, param: Parameters<CreateSite>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.site_creation.propose(param.0))
    }

    #[tool(
        description = "Step 2 of 2: create a new site on a server. Requires the confirmationId from confirm_site_creation, issued after the user approved its summary. Every other parameter must equal the proposal or nothing is performed.",
        annotations(title = "Create Site", read_only_hint = false, destructive_hint = false, open_world_hint = true)
    )]
    async fn create_site(&self, param: Parameters<ExecuteRequest<CreateSite>>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.site_creation.execute(&self.services.client, param.0).await)
    }

    #[tool(
        description = "Step 1 of 2: propose to switch the PHP version of a site. Returns a summary, a confirmationId and the execute tool to call. Changes nothing. Show the summary to the user and continue with change_site_php_version only after an explicit yes.",
        annotations(title = "Confirm Change Site PHP Version", read_only_hint = false, destructive_hint = false, open_world_hint = false)
    )]
    async fn confirm_change_site_php_version(&self, param: Parameters<ChangeSitePhpVersion>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.site_php_version.propose(param.0))
    }

    #[tool(
        description = "Step 2 of 2: switch the PHP version of a site. Requires the confirmationId from confirm_change_site_php_version, issued after the user approved its summary. Every other parameter must equal the proposal or nothing is performed.",
        annotations(title = "Change Site PHP Version", read_only_hint = false, destructive_hint = false, open_world_hint = true)
    )]
    async fn change_site_php_version(&self, param: Parameters<ExecuteRequest<ChangeSitePhpVersion>>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.site_php_version.execute(&self.services.client, param.0).await)
    }

    #[tool(
        description = "Step 1 of 2: propose to add domain aliases to a site. Returns a summary, a confirmationId and the execute tool to call. Changes nothing. Show the summary to the user and continue with add_site_aliases only after an explicit yes.",
        annotations(title = "Confirm Add Site Aliases", read_only_hint = false, destructive_hint = false, open_world_hint = false)
    )]
    async fn confirm_add_site_aliases(&self, param: Parameters<AddSiteAliases>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.site_aliases.propose(param.0))
    }

    #[tool(
        description = "Step 2 of 2: add domain aliases to a site. Requires the confirmationId from confirm_add_site_aliases, issued after the user approved its summary. Every other parameter must equal the proposal or nothing is performed.",
        annotations(title = "Add Site Aliases", read_only_hint = false, destructive_hint = false, open_world_hint = true)
    )]
    async fn add_site_aliases(&self, param: Parameters<ExecuteRequest<AddSiteAliases>>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.site_aliases.execute(&self.services.client, param.0).await)
    }

    #[tool(
        description = "Step 1 of 2: propose to clear the application log of a site. Returns a summary, a confirmationId and the execute tool to call. Changes nothing. Show the summary to the user and continue with clear_site_log only after an explicit yes.",
        annotations(title = "Confirm Clear Site Log", read_only_hint = false, destructive_hint = false, open_world_hint = false)
    )]
    async fn confirm_clear_site_log(&self, param: Parameters<ClearSiteLog>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.site_log_clear.propose(param.0))
    }

    #[tool(
        description = "Step 2 of 2: clear the application log of a site. Requires the confirmationId from confirm_clear_site_log, issued after the user approved its summary. Every other parameter must equal the proposal or nothing is performed.",
        annotations(title = "Clear Site Log", read_only_hint = false, destructive_hint = false, open_world_hint = true)
    )]
    async fn clear_site_log(&self, param: Parameters<ExecuteRequest<ClearSiteLog>>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.site_log_clear.execute(&self.services.client, param.0).await)
    }

    #[tool(
        description = "Step 1 of 2: propose to permanently delete a site and its files. Returns a summary, a confirmationId and the execute tool to call. Changes nothing. Show the summary to the user and continue with delete_site only after an explicit yes.",
        annotations(title = "Confirm Delete Site", read_only_hint = false, destructive_hint = true, open_world_hint = false)
    )]
    async fn confirm_site_deletion(&self, param: Parameters<DeleteSite>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.site_deletion.propose(param.0))
    }

    #[tool(
        description = "Step 2 of 2: permanently delete a site and its files. Requires the confirmationId from confirm_site_deletion, issued after the user approved its summary. Every other parameter must equal the proposal or nothing is performed.",
        annotations(title = "Delete Site", read_only_hint = false, destructive_hint = true, open_world_hint = true)
    )]
    async fn delete_site(&self, param: Parameters<ExecuteRequest<DeleteSite>>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.site_deletion.execute(&self.services.client, param.0).await)
    }

    #[tool(
        description = "Step 1 of 2: propose to attach or replace the Git repository of a site. Returns a summary, a confirmationId and the execute tool to call. Changes nothing. Show the summary to the user and continue with install_or_update_site_git only after an explicit yes.",
        annotations(title = "Confirm Install Or Update Site Git", read_only_hint = false, destructive_hint = false, open_world_hint = false)
    )]
    async fn confirm_install_or_update_site_git(&self, param: Parameters<InstallOrUpdateSiteGit>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.site_git_install.propose(param.0))
    }

    #[tool(
        description = "Step 2 of 2: attach or replace the Git repository of a site. Requires the confirmationId from confirm_install_or_update_site_git, issued after the user approved its summary. Every other parameter must equal the proposal or nothing is performed.",
        annotations(title = "Install Or Update Site Git", read_only_hint = false, destructive_hint = false, open_world_hint = true)
    )]
    async fn install_or_update_site_git(&self, param: Parameters<ExecuteRequest<InstallOrUpdateSiteGit>>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.site_git_install.execute(&self.services.client, param.0).await)
    }

    #[tool(
        description = "Step 1 of 2: propose to remove the Git repository and its files from a site. Returns a summary, a confirmationId and the execute tool to call. Changes nothing. Show the summary to the user and continue with remove_site_git only after an explicit yes.",
        annotations(title = "Confirm Remove Site Git", read_only_hint = false, destructive_hint = true, open_world_hint = false)
    )]
    async fn confirm_remove_site_git(&self, param: Parameters<RemoveSiteGit>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.site_git_removal.propose(param.0))
    }

    #[tool(
        description = "Step 2 of 2: remove the Git repository and its files from a site. Requires the confirmationId from confirm_remove_site_git, issued after the user approved its summary. Every other parameter must equal the proposal or nothing is performed.",
        annotations(title = "Remove Site Git", read_only_hint = false, destructive_hint = true, open_world_hint = true)
    )]
    async fn remove_site_git(&self, param: Parameters<ExecuteRequest<RemoveSiteGit>>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.site_git_removal.execute(&self.services.client, param.0).await)
    }
}
