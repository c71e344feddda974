use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, ErrorData};
use rmcp::{tool, tool_router};

use crate::catalog::{regions_for, sizes_for};
use crate::server::core::ForgeMcpCore;
use crate::server::schemas::{RegionsRequest, SizesRequest};

#[tool_router(router = account_tools, vis = "pub(crate)")]
impl ForgeMcpCore {
    #[tool(
        description = "Get the Forge account the API key belongs to.",
        annotations(title = "Get User", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn get_user(&self) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch("/user").await)
    }

    #[tool(
        description = "List provider credentials. Their ids are the credentialId of confirm_server_creation.",
        annotations(title = "List Credentials", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn list_credentials(&self) -> Result<CallToolResult, ErrorData> {
        Ok(self.fetch("/credentials").await)
    }

    #[tool(
        description = "List the regions one provider offers. Input: provider from list_providers.",
        annotations(title = "List Regions", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn list_regions(&self, param: Parameters<RegionsRequest>) -> Result<CallToolResult, ErrorData> {
        let provider = param.0.provider;
        Ok(self.fetch_with("/regions", |regions| regions_for(&regions, &provider)).await)
    }

    #[tool(
        description = "List the server sizes of one provider region. Input: provider and region from list_regions.",
        annotations(title = "List Sizes", read_only_hint = true, destructive_hint = false, open_world_hint = true)
    )]
    async fn list_sizes(&self, param: Parameters<SizesRequest>) -> Result<CallToolResult, ErrorData> {
        let SizesRequest { provider, region } = param.0;
        Ok(self
            .fetch_with("/regions", |regions| sizes_for(&regions, &provider, &region))
            .await)
    }
}
