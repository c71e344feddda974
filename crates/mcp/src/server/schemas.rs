//! Parameters of the read and diagnostic tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::actions::site_endpoint;
use crate::types::ResourceId;

/// Parameters for `test_connection`.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TestConnectionRequest {
    #[schemars(description = "Any text; it is echoed back with the server time.")]
    pub message: String,
}

/// A provider to look regions up for.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RegionsRequest {
    #[schemars(description = "Provider id from list_providers, for example ocean2.")]
    pub provider: String,
}

/// A provider region to look sizes up for.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SizesRequest {
    #[schemars(description = "Provider id from list_providers, for example ocean2.")]
    pub provider: String,
    #[schemars(description = "Region id from list_regions, for example fra1.")]
    pub region: String,
}

#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServerRequest {
    #[schemars(description = "Server id from list_servers.")]
    pub server_id: ResourceId,
}

impl ServerRequest {
    pub fn endpoint(&self) -> String {
        format!("/servers/{}", self.server_id)
    }
}

#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SiteRequest {
    #[schemars(description = "Server id from list_servers.")]
    pub server_id: ResourceId,
    #[schemars(description = "Site id from list_sites.")]
    pub site_id: ResourceId,
}

impl SiteRequest {
    pub fn endpoint(&self) -> String {
        site_endpoint(&self.server_id, &self.site_id)
    }
}

#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DaemonRequest {
    #[schemars(description = "Server id from list_servers.")]
    pub server_id: ResourceId,
    #[schemars(description = "Daemon id from list_daemons.")]
    pub daemon_id: ResourceId,
}

#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRequest {
    #[serde(flatten)]
    pub site: SiteRequest,
    #[schemars(description = "Deployment id from list_deployments.")]
    pub deployment_id: ResourceId,
}

impl DeploymentRequest {
    pub fn endpoint(&self) -> String {
        format!("{}/deployment-history/{}", self.site.endpoint(), self.deployment_id)
    }
}

#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseRequest {
    #[schemars(description = "Server id from list_servers.")]
    pub server_id: ResourceId,
    #[schemars(description = "Database id from list_databases.")]
    pub database_id: ResourceId,
}

#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseUserRequest {
    #[schemars(description = "Server id from list_servers.")]
    pub server_id: ResourceId,
    #[schemars(description = "Database user id from list_database_users.")]
    pub user_id: ResourceId,
}

#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRequest {
    #[serde(flatten)]
    pub site: SiteRequest,
    #[schemars(description = "Certificate id from list_certificates.")]
    pub certificate_id: ResourceId,
}

#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SiteCommandRequest {
    #[serde(flatten)]
    pub site: SiteRequest,
    #[schemars(description = "Command id from list_site_commands or execute_site_command.")]
    pub command_id: ResourceId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nested_requests_read_flat_fields() {
        let request: DeploymentRequest = serde_json::from_value(json!({
            "serverId": 1,
            "siteId": "2",
            "deploymentId": 3
        }))
        .unwrap();
        assert_eq!(request.endpoint(), "/servers/1/sites/2/deployment-history/3");
    }

    #[test]
    fn ids_with_path_characters_are_refused() {
        let parsed = serde_json::from_value::<ServerRequest>(json!({"serverId": "1/../2"}));
        assert!(parsed.is_err());
    }
}
