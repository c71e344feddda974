//! Streamable HTTP host for the MCP server, loopback only.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use axum::Router;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::server::categories::ToolCategorySet;
use crate::server::core::{ForgeMcpCore, ForgeServices};

/// Route the MCP endpoint is mounted on.
pub const MCP_PATH: &str = "/mcp";
const DEFAULT_BIND: &str = "127.0.0.1:0";
const SESSION_POLL: Duration = Duration::from_millis(500);

/// Loopback HTTP host for [`ForgeMcpCore`].
#[derive(Debug, Clone)]
pub struct McpHttpServer {
    bind_address: SocketAddr,
    services: Arc<ForgeServices>,
    categories: ToolCategorySet,
}

impl McpHttpServer {
    /// Every session gets its own handler over the same shared services,
    /// so confirmations issued in one session are visible to all.
    pub fn new(bind_address: SocketAddr, services: Arc<ForgeServices>, categories: ToolCategorySet) -> Self {
        Self {
            bind_address,
            services,
            categories,
        }
    }

    /// Bind, spawn the server and the session watcher, and hand back a handle.
    pub async fn start(self) -> Result<RunningMcpHttpServer> {
        let listener = TcpListener::bind(self.bind_address)
            .await
            .with_context(|| format!("cannot bind MCP HTTP server to {}", self.bind_address))?;
        let bound_address = listener.local_addr()?;

        let shutdown = CancellationToken::new();
        let sessions = Arc::new(LocalSessionManager::default());
        let session_count = Arc::new(AtomicUsize::new(0));

        let core = ForgeMcpCore::new(self.services, self.categories);
        let config = StreamableHttpServerConfig {
            stateful_mode: true,
            sse_keep_alive: None,
            cancellation_token: shutdown.child_token(),
            ..Default::default()
        };
        let service: StreamableHttpService<ForgeMcpCore, LocalSessionManager> =
            StreamableHttpService::new(move || Ok(core.clone()), Arc::clone(&sessions), config);
        let router = Router::new().nest_service(MCP_PATH, service);

        let server = tokio::spawn(serve(listener, router, shutdown.child_token()));
        let watcher = tokio::spawn(watch_sessions(sessions, Arc::clone(&session_count), shutdown.child_token()));
        info!(address = %bound_address, path = MCP_PATH, "MCP HTTP server listening");

        Ok(RunningMcpHttpServer {
            bound_address,
            shutdown,
            server,
            watcher,
            session_count,
        })
    }
}

/// Handle to a started [`McpHttpServer`].
#[derive(Debug)]
pub struct RunningMcpHttpServer {
    bound_address: SocketAddr,
    shutdown: CancellationToken,
    server: JoinHandle<()>,
    watcher: JoinHandle<()>,
    session_count: Arc<AtomicUsize>,
}

impl RunningMcpHttpServer {
    pub fn bound_address(&self) -> SocketAddr {
        self.bound_address
    }

    /// Open MCP sessions as last sampled.
    pub fn connected_clients(&self) -> usize {
        self.session_count.load(Ordering::Relaxed)
    }

    /// Cancel, then wait for the server and the watcher to wind down.
    pub async fn stop(self) -> Result<()> {
        self.shutdown.cancel();
        self.watcher.await.context("MCP HTTP session watcher panicked")?;
        self.server.await.context("MCP HTTP server task panicked")?;
        Ok(())
    }
}

/// Parse a bind address, defaulting to an ephemeral loopback port.
///
/// Anything that is not a loopback IP is refused.
pub fn resolve_bind_address(bind_address: Option<&str>) -> Result<SocketAddr> {
    let raw = bind_address.unwrap_or(DEFAULT_BIND);
    let address: SocketAddr = raw
        .parse()
        .with_context(|| format!("invalid MCP HTTP bind address '{raw}'"))?;
    if !address.ip().is_loopback() {
        bail!("MCP HTTP server must bind to a loopback address, got {address}");
    }
    Ok(address)
}

async fn serve(listener: TcpListener, router: Router, shutdown: CancellationToken) {
    let result = axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await;
    if let Err(error) = result {
        warn!(%error, "MCP HTTP server stopped with an error");
    }
}

async fn watch_sessions(sessions: Arc<LocalSessionManager>, session_count: Arc<AtomicUsize>, shutdown: CancellationToken) {
    let mut ticker = tokio::time::interval(SESSION_POLL);
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => return,
            _ = ticker.tick() => {
                let open = sessions.sessions.read().await.len();
                if session_count.swap(open, Ordering::Relaxed) != open {
                    debug!(sessions = open, "MCP HTTP session count changed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_gate_api::{ForgeClient, ForgeClientConfig};

    use crate::actions::ActionRegistry;

    #[test]
    fn default_bind_is_an_ephemeral_loopback_port() {
        let address = resolve_bind_address(None).unwrap();
        assert!(address.ip().is_loopback());
        assert_eq!(address.port(), 0);
    }

    #[test]
    fn non_loopback_addresses_are_refused() {
        assert!(resolve_bind_address(Some("0.0.0.0:8080")).is_err());
        assert!(resolve_bind_address(Some("[::1]:8080")).is_ok());
        assert!(resolve_bind_address(Some("localhost:8080")).is_err());
    }

    #[tokio::test]
    async fn server_binds_an_ephemeral_port_and_stops() {
        let client = ForgeClient::new(ForgeClientConfig::new("test-key")).unwrap();
        let services = Arc::new(ForgeServices::new(client, ActionRegistry::default()));
        let address = resolve_bind_address(None).unwrap();

        let running = McpHttpServer::new(address, services, ToolCategorySet::READONLY)
            .start()
            .await
            .unwrap();
        assert_ne!(running.bound_address().port(), 0);
        assert_eq!(running.connected_clients(), 0);
        running.stop().await.unwrap();
    }
}
