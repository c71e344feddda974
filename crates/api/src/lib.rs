//! Laravel Forge API client utilities.
//!
//! This crate provides the single outbound path used by every Forge Gate tool.
//! It focuses on:
//!
//! - Constructing an HTTP client with bearer authentication and JSON headers
//! - Validating the configured base URL for safety
//! - Turning a logical [`ForgeRequest`] into a call and normalising the body
//! - Separating network failures from non-success responses in [`ForgeApiError`]
//!
//! No retries happen here; callers that need to wait on remote jobs poll
//! through `forge_gate_util::poll_until`.
//!
//! # Example
//!
//! ```ignore
//! use forge_gate_api::{ForgeClient, ForgeClientConfig, ForgeRequest};
//!
//! async fn servers() -> Result<serde_json::Value, forge_gate_api::ForgeApiError> {
//!     let client = ForgeClient::new(ForgeClientConfig::new("token"))?;
//!     client.send(ForgeRequest::get("/servers")).await
//! }
//! ```

mod error;

use std::time::{Duration, Instant};

use forge_gate_util::truncate_preview;
use reqwest::{Client, Method, Response, header};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

pub use error::ForgeApiError;

/// Public Forge API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://forge.laravel.com/api/v1";
/// Outbound request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Allowed hostnames or base domains for non-local base URLs. Subdomains are
/// also allowed.
const ALLOWED_FORGE_DOMAINS: &[&str] = &["forge.laravel.com"];
/// Hostnames allowed for local development regardless of scheme.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

/// Settings for building a [`ForgeClient`].
#[derive(Clone)]
pub struct ForgeClientConfig {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl ForgeClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl std::fmt::Debug for ForgeClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForgeClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Logical description of one Forge API call.
#[derive(Debug, Clone, PartialEq)]
pub struct ForgeRequest {
    pub method: Method,
    /// Path relative to the base URL, starting with `/`.
    pub endpoint: String,
    pub payload: Option<Value>,
}

impl ForgeRequest {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            payload: None,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    /// Attach a JSON body.
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Thin wrapper around a configured `reqwest::Client` for Forge API access.
///
/// The credential is installed as a default `Authorization` header when the
/// client is built and is never exposed again.
#[derive(Debug, Clone)]
pub struct ForgeClient {
    base_url: String,
    http: Client,
}

impl ForgeClient {
    /// Build a client from the given settings.
    ///
    /// Fails when the API key is empty or the base URL does not pass
    /// [`validate_base_url`].
    pub fn new(config: ForgeClientConfig) -> Result<Self, ForgeApiError> {
        if config.api_key.trim().is_empty() {
            return Err(ForgeApiError::MissingApiKey);
        }
        validate_base_url(&config.base_url)?;

        let mut default_headers = header::HeaderMap::new();
        let mut authorization = header::HeaderValue::from_str(&format!("Bearer {}", config.api_key.trim()))?;
        authorization.set_sensitive(true);
        default_headers.insert(header::AUTHORIZATION, authorization);
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        default_headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(default_headers)
            .user_agent(format!("forge-gate/{}; {}", env!("CARGO_PKG_VERSION"), std::env::consts::OS))
            .timeout(config.timeout)
            .build()
            .map_err(ForgeApiError::ClientBuild)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a request and return the decoded body.
    ///
    /// Bodies declared as `application/json` are parsed; anything else is
    /// returned as a JSON string holding the raw text. An empty body decodes to
    /// `null`.
    pub async fn send(&self, request: ForgeRequest) -> Result<Value, ForgeApiError> {
        let ForgeRequest {
            method,
            endpoint,
            payload,
        } = request;
        let url = format!("{}{}", self.base_url, endpoint);
        debug!(%method, %endpoint, "forge request");

        let mut builder = self.http.request(method.clone(), url);
        if let Some(body) = payload.as_ref() {
            builder = builder.json(body);
        }

        let start = Instant::now();
        let response = builder.send().await.map_err(|source| {
            warn!(%method, %endpoint, error = %source, "forge request failed before a response arrived");
            ForgeApiError::network(&method, &endpoint, source)
        })?;

        let status = response.status();
        let body = read_body(response)
            .await
            .map_err(|source| ForgeApiError::network(&method, &endpoint, source))?;
        let duration_ms = start.elapsed().as_millis() as u64;

        if !status.is_success() {
            warn!(%method, %endpoint, status = status.as_u16(), duration_ms, "forge request returned an error status");
            return Err(ForgeApiError::Api {
                method: method.to_string(),
                endpoint,
                status: status.as_u16(),
                body,
            });
        }

        debug!(%method, %endpoint, status = status.as_u16(), duration_ms, "forge request completed");
        Ok(body)
    }

    pub async fn get(&self, endpoint: impl Into<String>) -> Result<Value, ForgeApiError> {
        self.send(ForgeRequest::get(endpoint)).await
    }

    pub async fn post(&self, endpoint: impl Into<String>, payload: Option<Value>) -> Result<Value, ForgeApiError> {
        let request = ForgeRequest::post(endpoint);
        self.send(match payload {
            Some(body) => request.with_payload(body),
            None => request,
        })
        .await
    }

    pub async fn delete(&self, endpoint: impl Into<String>) -> Result<Value, ForgeApiError> {
        self.send(ForgeRequest::delete(endpoint)).await
    }
}

async fn read_body(response: Response) -> Result<Value, reqwest::Error> {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.contains("application/json"));
    let text = response.text().await?;
    Ok(decode_body(&text, is_json))
}

fn decode_body(text: &str, is_json: bool) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    if !is_json {
        return Value::String(text.to_string());
    }
    match serde_json::from_str::<Value>(text) {
        Ok(value) => value,
        Err(error) => {
            warn!(%error, preview = %truncate_preview(text, 200), "response declared JSON but did not parse");
            Value::String(text.to_string())
        }
    }
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS, and host must be `forge.laravel.com` or
///   a subdomain of it
pub fn validate_base_url(base: &str) -> Result<(), ForgeApiError> {
    let invalid = |reason: String| ForgeApiError::InvalidBaseUrl {
        base_url: base.to_string(),
        reason,
    };
    let parsed_base_url = Url::parse(base).map_err(|error| invalid(error.to_string()))?;

    let host_name = parsed_base_url
        .host_str()
        .ok_or_else(|| invalid("must include a host".to_string()))?;

    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        return Ok(());
    }

    if parsed_base_url.scheme() != "https" {
        return Err(invalid(format!(
            "must use https for non-localhost hosts; got '{}://'",
            parsed_base_url.scheme()
        )));
    }

    let is_allowed_domain = ALLOWED_FORGE_DOMAINS.iter().any(|&allowed_domain| {
        host_name.eq_ignore_ascii_case(allowed_domain) || host_name.ends_with(&format!(".{allowed_domain}"))
    });
    if !is_allowed_domain {
        return Err(invalid(format!(
            "host '{host_name}' is not allowed; must be one of {ALLOWED_FORGE_DOMAINS:?} or a subdomain, or localhost"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_base_url_is_valid() {
        assert!(validate_base_url(DEFAULT_BASE_URL).is_ok());
    }

    #[test]
    fn localhost_accepts_plain_http() {
        assert!(validate_base_url("http://127.0.0.1:8080/api/v1").is_ok());
        assert!(validate_base_url("http://LOCALHOST:3000").is_ok());
    }

    #[test]
    fn remote_hosts_require_https() {
        let error = validate_base_url("http://forge.laravel.com/api/v1").unwrap_err();
        assert!(error.to_string().contains("https"));
    }

    #[test]
    fn foreign_hosts_are_rejected() {
        assert!(validate_base_url("https://forge.laravel.com.evil.test").is_err());
        assert!(validate_base_url("https://staging.forge.laravel.com/api").is_ok());
    }

    #[test]
    fn unparseable_urls_are_rejected() {
        assert!(matches!(
            validate_base_url("not a url"),
            Err(ForgeApiError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let error = ForgeClient::new(ForgeClientConfig::new("   ")).unwrap_err();
        assert!(matches!(error, ForgeApiError::MissingApiKey));
    }

    #[test]
    fn debug_output_hides_the_api_key() {
        let rendered = format!("{:?}", ForgeClientConfig::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
    }

    #[test]
    fn decode_body_negotiates_on_content_type() {
        assert_eq!(decode_body(r#"{"a":1}"#, true), serde_json::json!({"a": 1}));
        assert_eq!(decode_body(r#"{"a":1}"#, false), Value::String(r#"{"a":1}"#.into()));
        assert_eq!(decode_body("", true), Value::Null);
        assert_eq!(decode_body("<html>", true), Value::String("<html>".into()));
    }

    #[test]
    fn trailing_slash_on_base_url_is_trimmed() {
        let client = ForgeClient::new(ForgeClientConfig::new("token").with_base_url("http://localhost:9000/api/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:9000/api");
    }
}
