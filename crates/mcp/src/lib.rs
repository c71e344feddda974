//! Model Context Protocol server exposing the Laravel Forge API.
//!
//! Read tools call Forge directly. Every mutating operation is split into a
//! propose tool that returns a human-readable summary and a single-use
//! confirmation token, and an execute tool that only acts when it receives
//! that token together with the exact parameters that were proposed. See
//! [`confirmation`] for the token store and [`actions`] for the action kinds.

pub mod actions;
pub mod catalog;
pub mod confirmation;
pub mod envelope;
pub mod server;
pub mod types;

pub use actions::{ActionPair, ActionRegistry, ConfirmableAction, ExecuteRequest, ProposalReceipt};
pub use confirmation::{ConfirmationStore, DEFAULT_CONFIRMATION_TTL};
pub use server::{
    ForgeMcpCore, ForgeServices, MCP_PATH, McpHttpServer, RunningMcpHttpServer, ToolCategory, ToolCategorySet, resolve_bind_address,
    serve_stdio,
};
pub use types::{ResourceId, ToolError};
