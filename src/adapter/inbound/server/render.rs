//! Response rendering at the wire boundary.

use serde::Deserialize;
use serde_json::Value;
use tracing::error;

use crate::domain::Response;

/// How responses are written to the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// One JSON envelope per line.
    #[default]
    Json,
    /// `OK` / `ERROR: <message>` followed by the result.
    Text,
}

/// Render `response` as the text to write back, without a trailing newline.
#[must_use]
pub fn render(response: &Response, format: ResponseFormat) -> String {
    match format {
        ResponseFormat::Json => render_json(response),
        ResponseFormat::Text => render_text(response),
    }
}

fn render_json(response: &Response) -> String {
    serde_json::to_string(response).unwrap_or_else(|err| {
        error!(error = %err, "Failed to encode response");
        r#"{"success":false,"errorMessage":"failed to encode response"}"#.to_string()
    })
}

fn render_text(response: &Response) -> String {
    if let Some(message) = response.error_message() {
        return format!("ERROR: {message}");
    }

    match response.result() {
        Value::Null => "OK".to_string(),
        Value::String(text) => format!("OK\n{text}"),
        Value::Array(items) if items.iter().all(Value::is_string) => {
            let lines: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            format!("OK\n{}", lines.join("\n"))
        }
        other => match serde_json::to_string_pretty(other) {
            Ok(pretty) => format!("OK\n{pretty}"),
            Err(_) => format!("OK\n{other}"),
        },
    }
}
