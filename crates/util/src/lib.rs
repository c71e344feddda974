//! Shared helpers for the Forge Gate crates.
//!
//! - [`redact_sensitive`] masks credentials before text reaches a log line.
//! - [`text`] shortens response bodies and tokens for diagnostics.
//! - [`poll`] runs bounded "is it done yet" loops against remote resources.

pub mod poll;
pub mod text;

use once_cell::sync::Lazy;
use regex::Regex;

pub use poll::{Backoff, PollOutcome, PollPolicy, poll_until};
pub use text::{token_prefix, truncate_preview};

static SENSITIVE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(authorization:\s*(?:bearer\s+)?)([\w\-\.=:/+]+)",
        r"(?i)([A-Z0-9_]*?(?:KEY|TOKEN|SECRET|PASSWORD)\s*[=:]\s*)([^\s,]+)",
        r#"(?i)("(?:[a-z0-9_]*?(?:key|token|secret|password))"\s*:\s*)("[^"]*")"#,
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Redacts values that look like secrets in a string.
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for pattern in SENSITIVE_PATTERNS.iter() {
        redacted = pattern
            .replace_all(&redacted, |caps: &regex::Captures| {
                let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("{prefix}<redacted>")
            })
            .to_string();
    }
    redacted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_bearer_headers() {
        let line = "Authorization: Bearer abc.def-123";
        assert_eq!(redact_sensitive(line), "Authorization: Bearer <redacted>");
    }

    #[test]
    fn redacts_env_style_assignments() {
        let line = "FORGE_API_KEY=s3cr3t other=value";
        let redacted = redact_sensitive(line);
        assert!(!redacted.contains("s3cr3t"));
        assert!(redacted.contains("other=value"));
    }

    #[test]
    fn redacts_json_password_fields() {
        let body = r#"{"name":"app","password":"hunter2"}"#;
        let redacted = redact_sensitive(body);
        assert!(!redacted.contains("hunter2"));
        assert!(redacted.contains(r#""name":"app""#));
    }

    #[test]
    fn leaves_plain_text_untouched() {
        assert_eq!(redact_sensitive("list_servers ok"), "list_servers ok");
    }
}
