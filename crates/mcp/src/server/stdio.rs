use anyhow::Context as _;
use rmcp::{ServiceExt, transport::stdio};
use tracing::info;

use crate::server::core::ForgeMcpCore;

/// Serve one session over stdin/stdout until the client disconnects.
pub async fn serve_stdio(core: ForgeMcpCore) -> anyhow::Result<()> {
    let server = core.serve(stdio()).await.context("start mcp server")?;
    info!("MCP stdio session started");
    let reason = server.waiting().await.context("wait for shutdown")?;
    info!(?reason, "MCP stdio session ended");
    Ok(())
}
