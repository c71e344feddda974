//! Command line and environment configuration.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use forge_gate_api::{DEFAULT_BASE_URL, ForgeClientConfig, validate_base_url};
use forge_gate_mcp::{ToolCategorySet, resolve_bind_address};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// MCP over stdin/stdout.
    Stdio,
    /// MCP streamable HTTP on a loopback address, served at /mcp.
    Http,
}

/// Laravel Forge MCP gateway. Mutating actions need a human-approved confirmation.
#[derive(Debug, Parser)]
#[command(name = "forge-gate", version, about)]
pub struct Args {
    /// Forge API token.
    #[arg(long, env = "FORGE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Forge API base URL.
    #[arg(long, env = "FORGE_API_BASE", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Tool categories to expose: readonly, write, destructive. Cumulative.
    #[arg(long, default_value_t = ToolCategorySet::READONLY)]
    pub tools: ToolCategorySet,

    /// Seconds a proposed action stays confirmable.
    #[arg(long, env = "FORGE_CONFIRMATION_TTL_SECS", default_value_t = 600)]
    pub confirmation_ttl_secs: u64,

    #[arg(long, value_enum, default_value_t = Transport::Stdio)]
    pub transport: Transport,

    /// Loopback address for the http transport.
    #[arg(long, default_value = "127.0.0.1:0")]
    pub bind: String,

    /// Timeout for each Forge request, in seconds.
    #[arg(long, default_value_t = 30)]
    pub request_timeout_secs: u64,
}

/// Validated settings the process runs with.
pub struct Settings {
    pub client: ForgeClientConfig,
    pub categories: ToolCategorySet,
    pub confirmation_ttl: Duration,
    pub transport: Transport,
    pub bind: Option<SocketAddr>,
}

impl TryFrom<Args> for Settings {
    type Error = anyhow::Error;

    fn try_from(args: Args) -> Result<Self> {
        let api_key = args.api_key.unwrap_or_default();
        if api_key.trim().is_empty() {
            bail!("Forge API key is missing. Pass --api-key or set FORGE_API_KEY.");
        }
        validate_base_url(&args.base_url)?;
        if args.confirmation_ttl_secs == 0 {
            bail!("--confirmation-ttl-secs must be greater than zero");
        }
        if args.request_timeout_secs == 0 {
            bail!("--request-timeout-secs must be greater than zero");
        }
        let bind = match args.transport {
            Transport::Http => Some(resolve_bind_address(Some(&args.bind))?),
            Transport::Stdio => None,
        };
        Ok(Self {
            client: ForgeClientConfig::new(api_key)
                .with_base_url(args.base_url)
                .with_timeout(Duration::from_secs(args.request_timeout_secs)),
            categories: args.tools,
            confirmation_ttl: Duration::from_secs(args.confirmation_ttl_secs),
            transport: args.transport,
            bind,
        })
    }
}
