use async_trait::async_trait;
use forge_gate_api::ForgeClient;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::summary::Summary;
use super::{ConfirmableAction, labelled};
use crate::types::{ResourceId, ToolError};

/// Create a database, optionally with an owning user.
#[derive(Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatabase {
    #[schemars(description = "Server id from list_servers.")]
    pub server_id: ResourceId,
    #[schemars(description = "Server name, shown in the confirmation summary.")]
    pub server_name: String,
    #[schemars(description = "Name of the new database.")]
    pub name: String,
    #[schemars(description = "Database user to create alongside the database. Requires password.")]
    pub user: Option<String>,
    #[schemars(description = "Password for the new user.")]
    pub password: Option<String>,
}

#[async_trait]
impl ConfirmableAction for CreateDatabase {
    const KIND: &'static str = "database creation";
    const PROPOSE_TOOL: &'static str = "confirm_create_database";
    const EXECUTE_TOOL: &'static str = "create_database";

    fn summary(&self) -> String {
        Summary::new("Are you sure you want to create a new database?")
            .field("Server", labelled(&self.server_name, &self.server_id))
            .field("Database Name", &self.name)
            .optional("User", self.user.as_ref())
            .secret("Password", self.password.as_deref())
            .finish()
    }

    fn check(&self) -> Result<(), ToolError> {
        let has_user = self.user.as_deref().is_some_and(|user| !user.is_empty());
        let has_password = self.password.as_deref().is_some_and(|password| !password.is_empty());
        if has_user && !has_password {
            return Err(ToolError::invalid("Password is required when user is provided."));
        }
        Ok(())
    }

    async fn perform(self, client: &ForgeClient) -> Result<Value, ToolError> {
        self.check()?;
        let mut payload = json!({ "name": self.name });
        if let Some(user) = self.user.filter(|user| !user.is_empty()) {
            payload["user"] = json!(user);
            payload["password"] = json!(self.password);
        }
        Ok(client
            .post(format!("/servers/{}/databases", self.server_id), Some(payload))
            .await?)
    }
}

impl std::fmt::Debug for CreateDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateDatabase")
            .field("server_id", &self.server_id)
            .field("server_name", &self.server_name)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Resync Forge's view of a database with the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncDatabase {
    pub server_id: ResourceId,
    #[schemars(description = "Database id from list_databases.")]
    pub database_id: ResourceId,
}

#[async_trait]
impl ConfirmableAction for SyncDatabase {
    const KIND: &'static str = "database sync";
    const PROPOSE_TOOL: &'static str = "confirm_sync_database";
    const EXECUTE_TOOL: &'static str = "sync_database";

    fn summary(&self) -> String {
        Summary::new("Are you sure you want to sync this database?")
            .field("Server ID", &self.server_id)
            .field("Database ID", &self.database_id)
            .finish()
    }

    async fn perform(self, client: &ForgeClient) -> Result<Value, ToolError> {
        let endpoint = format!("/servers/{}/databases/{}/sync", self.server_id, self.database_id);
        Ok(client.post(endpoint, None).await?)
    }
}

/// Drop a database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDatabase {
    pub server_id: ResourceId,
    pub server_name: String,
    #[schemars(description = "Database id from list_databases.")]
    pub database_id: ResourceId,
    pub database_name: String,
}

#[async_trait]
impl ConfirmableAction for DeleteDatabase {
    const KIND: &'static str = "database deletion";
    const PROPOSE_TOOL: &'static str = "confirm_delete_database";
    const EXECUTE_TOOL: &'static str = "delete_database";

    fn summary(&self) -> String {
        Summary::new("Are you sure you want to delete this database?")
            .warning("All data in the database will be permanently lost. This cannot be undone.")
            .field("Server", labelled(&self.server_name, &self.server_id))
            .field("Database", labelled(&self.database_name, &self.database_id))
            .finish()
    }

    async fn perform(self, client: &ForgeClient) -> Result<Value, ToolError> {
        Ok(client
            .delete(format!("/servers/{}/databases/{}", self.server_id, self.database_id))
            .await?)
    }
}

/// Create a database user with access to some databases.
#[derive(Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatabaseUser {
    pub server_id: ResourceId,
    pub server_name: String,
    #[schemars(description = "Username of the new database user.")]
    pub name: String,
    pub password: String,
    #[schemars(description = "Database ids the user may access, from list_databases. Order matters for confirmation.")]
    pub databases: Vec<ResourceId>,
}

#[async_trait]
impl ConfirmableAction for CreateDatabaseUser {
    const KIND: &'static str = "database user creation";
    const PROPOSE_TOOL: &'static str = "confirm_create_database_user";
    const EXECUTE_TOOL: &'static str = "create_database_user";

    fn summary(&self) -> String {
        Summary::new("Are you sure you want to create a new database user?")
            .field("Server", labelled(&self.server_name, &self.server_id))
            .field("Username", &self.name)
            .secret("Password", Some(self.password.as_str()))
            .list("Databases", &self.databases)
            .finish()
    }

    fn check(&self) -> Result<(), ToolError> {
        if self.password.is_empty() {
            return Err(ToolError::invalid("Password must not be empty."));
        }
        Ok(())
    }

    async fn perform(self, client: &ForgeClient) -> Result<Value, ToolError> {
        let payload = json!({
            "name": self.name,
            "password": self.password,
            "databases": self.databases.iter().map(ResourceId::to_json).collect::<Vec<_>>(),
        });
        Ok(client
            .post(format!("/servers/{}/database-users", self.server_id), Some(payload))
            .await?)
    }
}

impl std::fmt::Debug for CreateDatabaseUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateDatabaseUser")
            .field("server_id", &self.server_id)
            .field("server_name", &self.server_name)
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .field("databases", &self.databases)
            .finish()
    }
}

/// Remove a database user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDatabaseUser {
    pub server_id: ResourceId,
    pub server_name: String,
    #[schemars(description = "Database user id from list_database_users.")]
    pub user_id: ResourceId,
    pub user_name: String,
}

#[async_trait]
impl ConfirmableAction for DeleteDatabaseUser {
    const KIND: &'static str = "database user deletion";
    const PROPOSE_TOOL: &'static str = "confirm_delete_database_user";
    const EXECUTE_TOOL: &'static str = "delete_database_user";

    fn summary(&self) -> String {
        Summary::new("Are you sure you want to delete this database user?")
            .warning("Applications using this user will lose database access. This cannot be undone.")
            .field("Server", labelled(&self.server_name, &self.server_id))
            .field("User", labelled(&self.user_name, &self.user_id))
            .finish()
    }

    async fn perform(self, client: &ForgeClient) -> Result<Value, ToolError> {
        Ok(client
            .delete(format!("/servers/{}/database-users/{}", self.server_id, self.user_id))
            .await?)
    }
}
