mod config;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use forge_gate_api::ForgeClient;
use forge_gate_mcp::{ActionRegistry, ForgeMcpCore, ForgeServices, MCP_PATH, McpHttpServer, serve_stdio};
use forge_gate_util::redact_sensitive;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::config::{Args, Settings, Transport};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    install_panic_hook();
    let settings = Settings::try_from(Args::parse())?;
    run(settings).await
}

/// Logs go to stderr; stdout carries the MCP stdio protocol.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        error!(panic = %redact_sensitive(&panic.to_string()), "unexpected panic");
        default_hook(panic);
    }));
}

async fn run(settings: Settings) -> Result<()> {
    debug!(client = ?settings.client, "forge client settings");
    let client = ForgeClient::new(settings.client).context("failed to build the Forge client")?;
    let services = Arc::new(ForgeServices::new(client, ActionRegistry::new(settings.confirmation_ttl)));
    let core = ForgeMcpCore::new(Arc::clone(&services), settings.categories);

    let tools = core.registered_tools();
    info!(
        categories = %settings.categories,
        tools = tools.len(),
        confirmation_ttl_secs = settings.confirmation_ttl.as_secs(),
        "forge-gate starting"
    );
    for (name, category) in &tools {
        debug!(tool = %name, %category, "tool registered");
    }

    match settings.transport {
        Transport::Http => {
            let bind_address = settings.bind.context("http transport needs a bind address")?;
            let running = McpHttpServer::new(bind_address, services, settings.categories)
                .start()
                .await
                .context("failed to start the MCP HTTP server")?;
            info!(url = %format!("http://{}{MCP_PATH}", running.bound_address()), "ready, press Ctrl-C to stop");
            tokio::signal::ctrl_c().await.context("failed to listen for Ctrl-C")?;
            info!(sessions = running.connected_clients(), "shutting down");
            running.stop().await
        }
        Transport::Stdio => serve_stdio(core).await,
    }
}
