use async_trait::async_trait;
use forge_gate_api::ForgeClient;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::summary::Summary;
use super::{ConfirmableAction, labelled};
use crate::types::{ResourceId, ToolError};

/// Provision a new server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServer {
    #[schemars(description = "Cloud provider id, for example ocean2, akamai, vultr2, aws, hetzner or custom. See list_providers.")]
    pub provider: String,
    #[schemars(description = "Provider credential id from list_credentials.")]
    pub credential_id: ResourceId,
    #[schemars(description = "Region id from list_regions, for example fra1.")]
    pub region: String,
    #[schemars(description = "Size id from list_sizes.")]
    pub size: String,
    #[schemars(description = "Ubuntu version, for example 24.04. See list_ubuntu_versions.")]
    pub ubuntu_version: String,
    #[schemars(description = "Database to install, for example mysql8 or postgres16. See list_database_types.")]
    pub database_type: String,
    #[schemars(description = "PHP version to install, for example php84. See list_static_php_versions.")]
    pub php_version: String,
    #[schemars(description = "Name for the new server.")]
    pub server_name: String,
}

#[async_trait]
impl ConfirmableAction for CreateServer {
    const KIND: &'static str = "server creation";
    const PROPOSE_TOOL: &'static str = "confirm_server_creation";
    const EXECUTE_TOOL: &'static str = "create_server";

    fn summary(&self) -> String {
        Summary::new("Please confirm the server creation with the following settings:")
            .field("Name", &self.server_name)
            .field("Provider", &self.provider)
            .field("Credential", &self.credential_id)
            .field("Region", &self.region)
            .field("Size", &self.size)
            .field("Ubuntu", &self.ubuntu_version)
            .field("Database", &self.database_type)
            .field("PHP", &self.php_version)
            .note("The provider will bill for the new server once it is provisioned.")
            .finish()
    }

    async fn perform(self, client: &ForgeClient) -> Result<Value, ToolError> {
        let payload = json!({
            "provider": self.provider,
            "credential_id": self.credential_id.to_json(),
            "region": self.region,
            "size": self.size,
            "php_version": self.php_version,
            "database_type": self.database_type,
            "name": self.server_name,
            "ubuntu_version": self.ubuntu_version,
        });
        Ok(client.post("/servers", Some(payload)).await?)
    }
}

/// Reboot a whole server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RebootServer {
    #[schemars(description = "Server id from list_servers.")]
    pub server_id: ResourceId,
    #[schemars(description = "Server name, shown in the confirmation summary.")]
    pub server_name: String,
}

#[async_trait]
impl ConfirmableAction for RebootServer {
    const KIND: &'static str = "server reboot";
    const PROPOSE_TOOL: &'static str = "confirm_server_reboot";
    const EXECUTE_TOOL: &'static str = "reboot_server";

    fn summary(&self) -> String {
        Summary::new("Are you sure you want to reboot this server?")
            .field("Server", labelled(&self.server_name, &self.server_id))
            .note("Every site on the server is unavailable while it restarts.")
            .finish()
    }

    async fn perform(self, client: &ForgeClient) -> Result<Value, ToolError> {
        Ok(client.post(format!("/servers/{}/reboot", self.server_id), None).await?)
    }
}

/// Services that can be restarted individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ServerService {
    Nginx,
    Php,
    Mysql,
    Postgres,
}

impl ServerService {
    pub fn as_str(self) -> &'static str {
        match self {
            ServerService::Nginx => "nginx",
            ServerService::Php => "php",
            ServerService::Mysql => "mysql",
            ServerService::Postgres => "postgres",
        }
    }

    fn display_name(self) -> &'static str {
        match self {
            ServerService::Nginx => "Nginx",
            ServerService::Php => "PHP-FPM",
            ServerService::Mysql => "MySQL",
            ServerService::Postgres => "PostgreSQL",
        }
    }
}

/// Restart one service on a server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestartService {
    #[schemars(description = "Server id from list_servers.")]
    pub server_id: ResourceId,
    #[schemars(description = "Server name, shown in the confirmation summary.")]
    pub server_name: String,
    #[schemars(description = "Service to restart: nginx, php, mysql or postgres.")]
    pub service: ServerService,
}

#[async_trait]
impl ConfirmableAction for RestartService {
    const KIND: &'static str = "service restart";
    const PROPOSE_TOOL: &'static str = "confirm_service_restart";
    const EXECUTE_TOOL: &'static str = "restart_service";

    fn summary(&self) -> String {
        Summary::new(format!("Are you sure you want to restart {}?", self.service.display_name()))
            .field("Server", labelled(&self.server_name, &self.server_id))
            .field("Service", self.service.as_str())
            .finish()
    }

    async fn perform(self, client: &ForgeClient) -> Result<Value, ToolError> {
        let endpoint = format!("/servers/{}/{}/reboot", self.server_id, self.service.as_str());
        Ok(client.post(endpoint, None).await?)
    }
}

/// Destroy a server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteServer {
    #[schemars(description = "Server id from list_servers.")]
    pub server_id: ResourceId,
    #[schemars(description = "Server name, shown in the confirmation summary.")]
    pub server_name: String,
}

#[async_trait]
impl ConfirmableAction for DeleteServer {
    const KIND: &'static str = "server deletion";
    const PROPOSE_TOOL: &'static str = "confirm_server_deletion";
    const EXECUTE_TOOL: &'static str = "delete_server";

    fn summary(&self) -> String {
        Summary::new("Please confirm deletion of server:")
            .warning("This permanently deletes the server and every site, database and file on it. It cannot be undone.")
            .field("Server ID", &self.server_id)
            .field("Server Name", &self.server_name)
            .finish()
    }

    async fn perform(self, client: &ForgeClient) -> Result<Value, ToolError> {
        Ok(client.delete(format!("/servers/{}", self.server_id)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn service_names_are_lowercase_on_the_wire() {
        let restart: RestartService = serde_json::from_value(json!({
            "serverId": "3",
            "serverName": "web-3",
            "service": "postgres"
        }))
        .unwrap();
        assert_eq!(restart.service, ServerService::Postgres);
        assert!(restart.summary().starts_with("Are you sure you want to restart PostgreSQL?"));
    }

    #[test]
    fn server_deletion_summary_warns_first() {
        let summary = DeleteServer {
            server_id: ResourceId::from(3),
            server_name: "web-3".into(),
        }
        .summary();
        assert!(summary.starts_with("WARNING:"));
        assert!(summary.contains("Server Name: web-3"));
    }

    #[test]
    fn server_creation_summary_lists_every_setting() {
        let summary = CreateServer {
            provider: "ocean2".into(),
            credential_id: ResourceId::from(5),
            region: "fra1".into(),
            size: "s-1vcpu-1gb".into(),
            ubuntu_version: "24.04".into(),
            database_type: "mysql8".into(),
            php_version: "php84".into(),
            server_name: "web-4".into(),
        }
        .summary();
        for expected in ["ocean2", "Credential: 5", "fra1", "s-1vcpu-1gb", "24.04", "mysql8", "php84", "web-4"] {
            assert!(summary.contains(expected), "missing {expected}");
        }
    }
}
