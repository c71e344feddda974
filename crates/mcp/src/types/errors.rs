//! Error types for tool execution.

use forge_gate_api::ForgeApiError;
use thiserror::Error;

/// Failure of a tool after its arguments were decoded.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Remote(#[from] ForgeApiError),

    /// Arguments are well formed but violate a rule of the action.
    #[error("{message}")]
    Invalid { message: String },

    /// The remote answered successfully with a body the tool cannot use.
    #[error("Unexpected response from Forge: {message}")]
    Unexpected { message: String },
}

impl ToolError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid { message: message.into() }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected { message: message.into() }
    }

    /// Short machine-readable class, used in error envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            ToolError::Remote(error) if error.is_network() => "remote_network_error",
            ToolError::Remote(_) => "remote_api_error",
            ToolError::Invalid { .. } => "invalid_arguments",
            ToolError::Unexpected { .. } => "unexpected_response",
        }
    }
}
