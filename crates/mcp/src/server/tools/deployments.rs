use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, ErrorData};
use rmcp::{tool, tool_router};

use crate::actions::{DeployNow, DisableQuickDeployment, EnableQuickDeployment, ExecuteRequest};
use crate::server::core::ForgeMcpCore;
use crate::server::schemas::{DeploymentRequest, SiteRequest};

#[tool_router(router = deployment_tools, vis = "pub(crate)")]
impl ForgeMcpCore {
    #[tool(
        description = "List the deployment history of a site.",
        annotations(title = "List Deployments", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn list_deployments(&self, param: Parameters<SiteRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch(format!("{}/deployment-history", param.0.endpoint())).await)
    }

    #[tool(
        description = "Get one deployment from the history of a site.",
        annotations(title = "Get Deployment", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn get_deployment(&self, param: Parameters<DeploymentRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch(param.0.endpoint()).await)
    }

    #[tool(
        description = "Get the output of one deployment.",
        annotations(title = "Get Deployment Output", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn get_deployment_output(&self, param: Parameters<DeploymentRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch(format!("{}/output", param.0.endpoint())).await)
    }

    #[tool(
        description = "Get the log of the latest deployment of a site.",
        annotations(title = "Get Deployment Log", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn get_deployment_log(&self, param: Parameters<SiteRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch(format!("{}/deployment/log", param.0.endpoint())).await)
    }

    #[tool(
        description = "Step 1 of 2: propose to turn on Quick Deploy so every push deploys the site. Returns a summary, a confirmationId and the execute tool to call. Changes nothing. Show the summary to the user and continue with enable_quick_deployment only after an explicit yes.",
        annotations(title = "Confirm Enable Quick Deployment", read_only_hint = false, destructive_hint = false, open_world_hint = false)
    )]
    async fn confirm_enable_quick_deployment(&self, param: Parameters<EnableQuickDeployment>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.quick_deploy_enable.propose(param.0))
    }

    #[tool(
        description = "Step 2 of 2: turn on Quick Deploy so every push deploys the site. Requires the confirmationId from confirm_enable_quick_deployment, issued after the user approved its summary. Every other parameter must equal the proposal or nothing is performed.",
        annotations(title = "Enable Quick Deployment", read_only_hint = false, destructive_hint = false, open_world_hint = true)
    )]
    async fn enable_quick_deployment(&self, param: Parameters<ExecuteRequest<EnableQuickDeployment>>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.quick_deploy_enable.execute(&self.services.client, param.0).await)
    }

    #[tool(
        description = "Step 1 of 2: propose to turn off Quick Deploy for a site. Returns a summary, a confirmationId and the execute tool to call. Changes nothing. Show the summary to the user and continue with disable_quick_deployment only after an explicit yes.",
        annotations(title = "Confirm Disable Quick Deployment", read_only_hint = false, destructive_hint = false, open_world_hint = false)
    )]
    async fn confirm_disable_quick_deployment(&self, param: Parameters<DisableQuickDeployment>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.quick_deploy_disable.propose(param.0))
    }

    #[tool(
        description = "Step 2 of 2: turn off Quick Deploy for a site. Requires the confirmationId from confirm_disable_quick_deployment, issued after the user approved its summary. Every other parameter must equal the proposal or nothing is performed.",
        annotations(title = "Disable Quick Deployment", read_only_hint = false, destructive_hint = false, open_world_hint = true)
    )]
    async fn disable_quick_deployment(&self, param: Parameters<ExecuteRequest<DisableQuickDeployment>>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.quick_deploy_disable.execute(&self.services.client, param.0).await)
    }

    #[tool(
        description = "Step 1 of 2: propose to trigger a deployment of a site immediately. Returns a summary, a confirmationId and the execute tool to call. Changes nothing. Show the summary to the user and continue with deploy_now only after an explicit yes.",
        annotations(title = "Confirm Deploy Now", read_only_hint = false, destructive_hint = false, open_world_hint = false)
    )]
    async fn confirm_deploy_now(&self, param: Parameters<DeployNow>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.deploy_now.propose(param.0))
    }

    #[tool(
        description = "Step 2 of 2: trigger a deployment of a site immediately. Requires the confirmationId from confirm_deploy_now, issued after the user approved its summary. Every other parameter must equal the proposal or nothing is performed.",
        annotations(title = "Deploy Now", read_only_hint = false, destructive_hint = false, open_world_hint = true)
    )]
    async fn deploy_now(&self, param: Parameters<ExecuteRequest<DeployNow>>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.deploy_now.execute(&self.services.client, param.0).await)
    }
}
