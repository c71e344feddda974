use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, ErrorData};
use rmcp::{tool, tool_router};

use crate::actions::{
    CreateDatabase, CreateDatabaseUser, DeleteDatabase, DeleteDatabaseUser, ExecuteRequest, SyncDatabase,
};
use crate::server::core::ForgeMcpCore;
use crate::server::schemas::{DatabaseRequest, DatabaseUserRequest, ServerRequest};

#[tool_router(router = database_tools, vis = "pub(crate)")]
impl ForgeMcpCore {
    #[tool(
        description = "List the databases of a server.",
        annotations(title = "List Databases", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn list_databases(&self, param: Parameters<ServerRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch(format!("{}/databases", param.0.endpoint())).await)
    }

    #[tool(
        description = "Get one database of a server.",
        annotations(title = "Get Database", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn get_database(&self, param: Parameters<DatabaseRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch(format!("/servers/{}/databases/{}", param.0.server_id, param.0.database_id)).await)
    }

    #[tool(
        description = "List the database users of a server. Their numeric ids are the userId of confirm_install_wordpress.",
        annotations(title = "List Database Users", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn list_database_users(&self, param: Parameters<ServerRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch(format!("{}/database-users", param.0.endpoint())).await)
    }

    #[tool(
        description = "Get one database user of a server.",
        annotations(title = "Get Database User", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn get_database_user(&self, param: Parameters<DatabaseUserRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch(format!("/servers/{}/database-users/{}", param.0.server_id, param.0.user_id)).await)
    }

    #[tool(
        description = "Step 1 of 2: propose to create a database, optionally with a user. Returns a summary, a confirmationId and the execute tool to call. Changes nothing. Show the summary to the user and continue with create_database only after an explicit yes.",
        annotations(title = "Confirm Create Database", read_only_hint = false, destructive_hint = false, open_world_hint = false)
    )]
    async fn confirm_create_database(&self, param: Parameters<CreateDatabase>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.database_creation.propose(param.0))
    }

    #[tool(
        description = "Step 2 of 2: create a database, optionally with a user. Requires the confirmationId from confirm_create_database, issued after the user approved its summary. Every other parameter must equal the proposal or nothing is performed.",
        annotations(title = "Create Database", read_only_hint = false, destructive_hint = false, open_world_hint = true)
    )]
    async fn create_database(&self, param: Parameters<ExecuteRequest<CreateDatabase>>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.database_creation.execute(&self.services.client, param.0).await)
    }

    #[tool(
        description = "Step 1 of 2: propose to resync Forge's record of a database with the server. Returns a summary, a confirmationId and the execute tool to call. Changes nothing. Show the summary to the user and continue with sync_database only after an explicit yes.",
        annotations(title = "Confirm Sync Database", read_only_hint = false, destructive_hint = false, open_world_hint = false)
    )]
    async fn confirm_sync_database(&self, param: Parameters<SyncDatabase>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.database_sync.propose(param.0))
    }

    #[tool(
        description = "Step 2 of 2: resync Forge's record of a database with the server. Requires the confirmationId from confirm_sync_database, issued after the user approved its summary. Every other parameter must equal the proposal or nothing is performed.",
        annotations(title = "Sync Database", read_only_hint = false, destructive_hint = false, open_world_hint = true)
    )]
    async fn sync_database(&self, param: Parameters<ExecuteRequest<SyncDatabase>>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.database_sync.execute(&self.services.client, param.0).await)
    }

    #[tool(
        description = "Step 1 of 2: propose to permanently drop a database and its data. Returns a summary, a confirmationId and the execute tool to call. Changes nothing. Show the summary to the user and continue with delete_database only after an explicit yes.",
        annotations(title = "Confirm Delete Database", read_only_hint = false, destructive_hint = true, open_world_hint = false)
    )]
    async fn confirm_delete_database(&self, param: Parameters<DeleteDatabase>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.database_deletion.propose(param.0))
    }

    #[tool(
        description = "Step 2 of 2: permanently drop a database and its data. Requires the confirmationId from confirm_delete_database, issued after the user approved its summary. Every other parameter must equal the proposal or nothing is performed.",
        annotations(title = "Delete Database", read_only_hint = false, destructive_hint = true, open_world_hint = true)
    )]
    async fn delete_database(&self, param: Parameters<ExecuteRequest<DeleteDatabase>>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.database_deletion.execute(&self.services.client, param.0).await)
    }

    #[tool(
        description = "Step 1 of 2: propose to create a database user with access to some databases. Returns a summary, a confirmationId and the execute tool to call. Changes nothing. Show the summary to the user and continue with create_database_user only after an explicit yes.",
        annotations(title = "Confirm Create Database User", read_only_hint = false, destructive_hint = false, open_world_hint = false)
    )]
    async fn confirm_create_database_user(&self, param: Parameters<CreateDatabaseUser>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.database_user_creation.propose(param.0))
    }

    #[tool(
        description = "Step 2 of 2: create a database user with access to some databases. Requires the confirmationId from confirm_create_database_user, issued after the user approved its summary. Every other parameter must equal the proposal or nothing is performed.",
        annotations(title = "Create Database User", read_only_hint = false, destructive_hint = false, open_world_hint = true)
    )]
    async fn create_database_user(&self, param: Parameters<ExecuteRequest<CreateDatabaseUser>>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.database_user_creation.execute(&self.services.client, param.0).await)
    }

    #[tool(
        description = "Step 1 of 2: propose to permanently delete a database user. Returns a summary, a confirmationId and the execute tool to call. Changes nothing. Show the summary to the user and continue with delete_database_user only after an explicit yes.",
        annotations(title = "Confirm Delete Database User", read_only_hint = false, destructive_hint = true, open_world_hint = false)
    )]
    async fn confirm_delete_database_user(&self, param: Parameters<DeleteDatabaseUser>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.database_user_deletion.propose(param.0))
    }

    #[tool(
        description = "Step 2 of 2: permanently delete a database user. Requires the confirmationId from confirm_delete_database_user, issued after the user approved its summary. Every other parameter must equal the proposal or nothing is performed.",
        annotations(title = "Delete Database User", read_only_hint = false, destructive_hint = true, open_world_hint = true)
    )]
    async fn delete_database_user(&self, param: Parameters<ExecuteRequest<DeleteDatabaseUser>>) -> Result<CallToolResult, ErrorData> {
        Ok(self.services.actions.database_user_deletion.execute(&self.services.client, param.0).await)
    }
}
