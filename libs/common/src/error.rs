//! Error payloads returned by the manga API
//!
//! The API reports failures as JSON. Most handlers answer with
//! `{"detail": "..."}`, request validation failures carry a list of
//! `{"msg": "..."}` entries under `detail`, and some gateways answer with
//! `{"error": "..."}`. This module turns any of those into one readable line.

use serde::Deserialize;
use serde_json::Value;

/// Raw error payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub detail: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorPayload {
    /// Human-readable message carried by the payload, if any
    pub fn message(&self) -> Option<String> {
        if let Some(detail) = &self.detail {
            match detail {
                Value::String(s) if !s.trim().is_empty() => return Some(s.clone()),
                Value::Array(items) => {
                    let joined = items
                        .iter()
                        .filter_map(|item| item.get("msg").and_then(Value::as_str))
                        .collect::<Vec<_>>()
                        .join("; ");
                    if !joined.is_empty() {
                        return Some(joined);
                    }
                }
                _ => {}
            }
        }

        self.error
            .clone()
            .or_else(|| self.message.clone())
            .filter(|s| !s.trim().is_empty())
    }
}

/// Extract a message from a raw response body
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .and_then(|payload| payload.message())
}
