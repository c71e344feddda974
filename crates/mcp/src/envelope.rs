//! Uniform tool results.
//!
//! Every tool returns one of three shapes: a success carrying the remote
//! payload, an error-flagged result carrying the failure message, or a
//! non-error "not performed" result when a confirmation is rejected. Tools
//! never surface their own failures as protocol errors.

use rmcp::model::{CallToolResult, Content};
use serde_json::{Value, json};

use crate::types::ToolError;

pub const CONFIRMATION_REJECTED: &str = "confirmation_rejected";

/// Wrap a successful payload.
///
/// Text payloads are passed through as-is. Anything else is pretty-printed,
/// and objects are also attached as structured content.
pub fn success(payload: Value) -> CallToolResult {
    let text = match &payload {
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    };
    let mut result = CallToolResult::success(vec![Content::text(text)]);
    if payload.is_object() {
        result.structured_content = Some(payload);
    }
    result
}

/// Wrap a failure. The text content is the error message itself.
pub fn failure(error: &ToolError) -> CallToolResult {
    let message = error.to_string();
    let mut detail = json!({
        "code": error.code(),
        "message": message,
    });
    if let ToolError::Remote(remote) = error {
        if let Some(status) = remote.status() {
            detail["status"] = json!(status);
        }
        if let Some(body) = remote.body() {
            detail["body"] = body.clone();
        }
    }
    let mut result = CallToolResult::error(vec![Content::text(message)]);
    result.structured_content = Some(json!({ "error": detail }));
    result
}

/// Result returned when an execute call presents an absent, consumed, expired
/// or mismatched confirmation. Not an error: nothing was attempted.
pub fn rejected(propose_tool: &str) -> CallToolResult {
    let message = format!(
        "Confirmation rejected or expired. The action was not performed. Call {propose_tool} again, \
         present the new summary to the user, and retry with the returned confirmationId and identical parameters."
    );
    let payload = json!({
        "performed": false,
        "reason": CONFIRMATION_REJECTED,
        "message": message,
        "proposeTool": propose_tool,
    });
    let mut result = CallToolResult::success(vec![Content::text(message)]);
    result.structured_content = Some(payload);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use forge_gate_api::ForgeApiError;

    fn rendered(result: &CallToolResult) -> Value {
        serde_json::to_value(result).unwrap()
    }

    #[test]
    fn success_pretty_prints_the_payload() {
        let result = rendered(&success(json!({"server": {"id": 1}})));
        assert_ne!(result["isError"], json!(true));
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("\n"));
        assert_eq!(result["structuredContent"]["server"]["id"], 1);
    }

    #[test]
    fn success_with_text_payload_has_no_structured_content() {
        let result = rendered(&success(Value::String("APP_ENV=production".into())));
        assert!(result.get("structuredContent").is_none());
        assert_eq!(result["content"][0]["text"], "APP_ENV=production");
    }

    #[test]
    fn failure_sets_the_error_flag_and_keeps_remote_detail() {
        let error = ToolError::from(ForgeApiError::Api {
            method: "DELETE".into(),
            endpoint: "/servers/1".into(),
            status: 404,
            body: json!({"message": "Not found"}),
        });
        let result = rendered(&failure(&error));
        assert_eq!(result["isError"], json!(true));
        assert!(result["content"][0]["text"].as_str().unwrap().contains("404"));
        assert_eq!(result["structuredContent"]["error"]["status"], 404);
        assert_eq!(result["structuredContent"]["error"]["body"]["message"], "Not found");
    }

    #[test]
    fn rejection_is_not_an_error_and_names_the_propose_tool() {
        let result = rendered(&rejected("confirm_delete_database"));
        assert_ne!(result["isError"], json!(true));
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("Confirmation rejected or expired"));
        assert!(text.contains("confirm_delete_database"));
        assert_eq!(result["structuredContent"]["performed"], false);
        assert_eq!(result["structuredContent"]["reason"], CONFIRMATION_REJECTED);
    }
}
