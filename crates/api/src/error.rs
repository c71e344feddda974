use forge_gate_util::truncate_preview;
use reqwest::Method;
use serde_json::Value;
use thiserror::Error;

/// Errors raised while building the client or calling the Forge API.
#[derive(Debug, Error)]
pub enum ForgeApiError {
    #[error("Forge API key is missing or empty")]
    MissingApiKey,

    #[error("invalid Forge API base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The remote could not be reached or the body could not be read.
    #[error("Network error calling {method} {endpoint}: {source}")]
    Network {
        method: String,
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The remote answered with a non-success status.
    #[error("Forge API error ({status}) on {method} {endpoint}: {}", render_body(.body))]
    Api {
        method: String,
        endpoint: String,
        status: u16,
        body: Value,
    },
}

impl ForgeApiError {
    pub(crate) fn network(method: &Method, endpoint: &str, source: reqwest::Error) -> Self {
        Self::Network {
            method: method.to_string(),
            endpoint: endpoint.to_string(),
            source,
        }
    }

    /// HTTP status for application-level failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Decoded response body for application-level failures.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Api { body, .. } => Some(body),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

fn render_body(body: &Value) -> String {
    let text = match body {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    truncate_preview(&text, 500)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn api_errors_render_status_and_body() {
        let error = ForgeApiError::Api {
            method: "DELETE".into(),
            endpoint: "/servers/1".into(),
            status: 422,
            body: json!({"message": "Server is busy"}),
        };
        let rendered = error.to_string();
        assert!(rendered.contains("422"));
        assert!(rendered.contains("Server is busy"));
        assert_eq!(error.status(), Some(422));
        assert!(!error.is_network());
    }

    #[test]
    fn text_bodies_render_without_quotes() {
        let error = ForgeApiError::Api {
            method: "GET".into(),
            endpoint: "/user".into(),
            status: 500,
            body: Value::String("upstream timeout".into()),
        };
        assert!(error.to_string().ends_with(": upstream timeout"));
    }
}
