use async_trait::async_trait;
use forge_gate_api::ForgeClient;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::summary::Summary;
use super::{ConfirmableAction, labelled, site_endpoint};
use crate::types::{ResourceId, ToolError};

/// Site reference with display labels, shared by the deployment actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteTarget {
    #[schemars(description = "Server id from list_servers.")]
    pub server_id: ResourceId,
    #[schemars(description = "Site id from list_sites.")]
    pub site_id: ResourceId,
    #[schemars(description = "Server name, shown in the confirmation summary.")]
    pub server_name: String,
    #[schemars(description = "Site name, shown in the confirmation summary.")]
    pub site_name: String,
}

impl SiteTarget {
    fn deployment_endpoint(&self) -> String {
        format!("{}/deployment", site_endpoint(&self.server_id, &self.site_id))
    }

    fn describe(&self, summary: Summary) -> Summary {
        summary
            .field("Server", labelled(&self.server_name, &self.server_id))
            .field("Site", labelled(&self.site_name, &self.site_id))
    }
}

/// Turn on deploy-on-push for a site's repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EnableQuickDeployment {
    #[serde(flatten)]
    pub target: SiteTarget,
}

#[async_trait]
impl ConfirmableAction for EnableQuickDeployment {
    const KIND: &'static str = "quick deployment enable";
    const PROPOSE_TOOL: &'static str = "confirm_enable_quick_deployment";
    const EXECUTE_TOOL: &'static str = "enable_quick_deployment";

    fn summary(&self) -> String {
        self.target
            .describe(Summary::new("Are you sure you want to enable Quick Deploy for the site?"))
            .note("Every push to the deployment branch will deploy the site.")
            .finish()
    }

    async fn perform(self, client: &ForgeClient) -> Result<Value, ToolError> {
        Ok(client.post(self.target.deployment_endpoint(), None).await?)
    }
}

/// Turn off deploy-on-push.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DisableQuickDeployment {
    #[serde(flatten)]
    pub target: SiteTarget,
}

#[async_trait]
impl ConfirmableAction for DisableQuickDeployment {
    const KIND: &'static str = "quick deployment disable";
    const PROPOSE_TOOL: &'static str = "confirm_disable_quick_deployment";
    const EXECUTE_TOOL: &'static str = "disable_quick_deployment";

    fn summary(&self) -> String {
        self.target
            .describe(Summary::new("Are you sure you want to disable Quick Deploy for the site?"))
            .finish()
    }

    async fn perform(self, client: &ForgeClient) -> Result<Value, ToolError> {
        Ok(client.delete(self.target.deployment_endpoint()).await?)
    }
}

/// Trigger a deployment immediately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DeployNow {
    #[serde(flatten)]
    pub target: SiteTarget,
}

#[async_trait]
impl ConfirmableAction for DeployNow {
    const KIND: &'static str = "deploy now";
    const PROPOSE_TOOL: &'static str = "confirm_deploy_now";
    const EXECUTE_TOOL: &'static str = "deploy_now";

    fn summary(&self) -> String {
        self.target
            .describe(Summary::new(
                "Are you sure you want to trigger a deployment (Deploy Now) for the site?",
            ))
            .finish()
    }

    async fn perform(self, client: &ForgeClient) -> Result<Value, ToolError> {
        let endpoint = format!("{}/deploy", self.target.deployment_endpoint());
        Ok(client.post(endpoint, None).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flattened_target_reads_top_level_fields() {
        let deploy: DeployNow = serde_json::from_value(json!({
            "serverId": "1",
            "siteId": 2,
            "serverName": "web-1",
            "siteName": "example.com"
        }))
        .unwrap();
        assert_eq!(deploy.target.site_id, ResourceId::from(2));
        let summary = deploy.summary();
        assert!(summary.contains("Server: web-1 (ID: 1)"));
        assert!(summary.contains("Site: example.com (ID: 2)"));
    }
}
