//! Shared types for tool parameters and tool failures.

pub mod errors;
pub mod ids;

pub use errors::ToolError;
pub use ids::ResourceId;
