//! Structured command result envelope.
//!
//! Every command invocation produces exactly one [`Response`]. The envelope
//! guarantees that a failure always carries a non-empty message and a success
//! never carries one; the constructors are the only way to build a value and
//! deserialization runs through the same checks.
//!
//! # Example
//!
//! ```
//! use edgectl::domain::Response;
//! use serde_json::json;
//!
//! let ok = Response::ok(json!(["alpha", "beta"]));
//! assert!(ok.is_success());
//! assert!(ok.error_message().is_none());
//!
//! let failed = Response::error("unknown command `frobnicate`");
//! assert!(!failed.is_success());
//! assert_eq!(failed.error_message(), Some("unknown command `frobnicate`"));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message used when a failure is built from an empty description.
const FALLBACK_ERROR: &str = "command failed";

/// Success/result/error envelope returned by every command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawResponse", rename_all = "camelCase")]
pub struct Response {
    success: bool,
    #[serde(skip_serializing_if = "Value::is_null")]
    result: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_message: Option<String>,
}

impl Response {
    /// A successful response carrying `result`.
    #[must_use]
    pub fn ok(result: Value) -> Self {
        Self {
            success: true,
            result,
            error_message: None,
        }
    }

    /// A failed response.
    ///
    /// A blank message is replaced so the envelope never fails silently.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            FALLBACK_ERROR.to_string()
        } else {
            message
        };
        Self {
            success: false,
            result: Value::Null,
            error_message: Some(message),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Command-specific payload; `Null` on failure.
    #[must_use]
    pub fn result(&self) -> &Value {
        &self.result
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

/// Wire shape accepted before the envelope invariants are checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawResponse {
    success: bool,
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error_message: Option<String>,
}

impl TryFrom<RawResponse> for Response {
    type Error = String;

    fn try_from(raw: RawResponse) -> Result<Self, Self::Error> {
        match (raw.success, raw.error_message) {
            (true, None) => Ok(Self::ok(raw.result)),
            (true, Some(_)) => Err("successful response must not carry an error message".into()),
            (false, Some(message)) if !message.trim().is_empty() => Ok(Self::error(message)),
            (false, _) => Err("failed response must carry an error message".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_error_message_is_replaced() {
        let response = Response::error("   ");
        assert_eq!(response.error_message(), Some(FALLBACK_ERROR));
    }

    #[test]
    fn success_serializes_without_error_field() {
        let text = serde_json::to_string(&Response::ok(json!({"active": true}))).unwrap();
        assert_eq!(text, r#"{"success":true,"result":{"active":true}}"#);
    }

    #[test]
    fn failure_serializes_camel_case_message() {
        let text = serde_json::to_string(&Response::error("boom")).unwrap();
        assert_eq!(text, r#"{"success":false,"errorMessage":"boom"}"#);
    }

    #[test]
    fn deserialize_rejects_failure_without_message() {
        let parsed: Result<Response, _> = serde_json::from_str(r#"{"success":false}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn deserialize_rejects_success_with_message() {
        let parsed: Result<Response, _> =
            serde_json::from_str(r#"{"success":true,"errorMessage":"odd"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn deserialize_accepts_wire_output() {
        let parsed: Response =
            serde_json::from_str(r#"{"success":true,"result":["a","b"]}"#).unwrap();
        assert_eq!(parsed, Response::ok(json!(["a", "b"])));
    }
}
