mod categories;
mod core;
mod http;
mod schemas;
mod stdio;
mod tools;

pub use categories::{CategoryParseError, ToolCategory, ToolCategorySet};
pub use core::{ForgeMcpCore, ForgeServices};
pub use http::{MCP_PATH, McpHttpServer, RunningMcpHttpServer, resolve_bind_address};
pub use stdio::serve_stdio;
