//! # Server Error Messages
//!
//! Resolves the billing server's error payloads into the single line (or
//! lines) of text shown in the form's error box.
//!
//! ## Payload Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Body                                          Shown as                 │
//! │  ────                                          ────────                 │
//! │  {"error": "Draft order 'X' not found."}       Draft order 'X' not ...  │
//! │  {"errors": ["Insufficient stock ...",          Insufficient stock ...  │
//! │              "Invalid quantity ..."]}           Invalid quantity ...    │
//! │  {"errors": {"items": "At least one ..."}}     {"items":"At least ..."} │
//! │  {} / not JSON / connection refused            Something went wrong.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `error` wins over `errors` when both are present and non-empty.

use serde_json::Value;
use std::fmt;

use crate::amount::format_json_number;
use crate::GENERIC_ERROR_MESSAGE;

/// An error reported by the server, resolved once at the HTTP boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorMessage {
    /// A single message.
    Text(String),
    /// Several messages, shown one per line.
    List(Vec<String>),
    /// Field-keyed errors, shown as compact JSON.
    Structured(Value),
}

impl ErrorMessage {
    /// The fallback shown when nothing better is available.
    pub fn generic() -> Self {
        ErrorMessage::Text(GENERIC_ERROR_MESSAGE.to_string())
    }

    /// Resolves a raw response body.
    ///
    /// Bodies that are not JSON objects resolve to [`ErrorMessage::generic`].
    pub fn from_response_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(payload) => Self::from_payload(&payload),
            Err(_) => Self::generic(),
        }
    }

    /// Resolves a parsed response body.
    ///
    /// ## Example
    /// ```rust
    /// use billing_core::ErrorMessage;
    /// use serde_json::json;
    ///
    /// let msg = ErrorMessage::from_payload(&json!({"errors": ["a", "b"]}));
    /// assert_eq!(msg.to_string(), "a\nb");
    ///
    /// let msg = ErrorMessage::from_payload(&json!({"detail": "nope"}));
    /// assert_eq!(msg.to_string(), "Something went wrong.");
    /// ```
    pub fn from_payload(payload: &Value) -> Self {
        let Some(object) = payload.as_object() else {
            return Self::generic();
        };

        [object.get("error"), object.get("errors")]
            .into_iter()
            .flatten()
            .find_map(Self::from_value)
            .unwrap_or_else(Self::generic)
    }

    /// Interprets one error field; empty values yield `None` so the next
    /// field is tried.
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null | Value::Bool(false) => None,
            Value::String(text) if text.is_empty() => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::String(text) => Some(ErrorMessage::Text(text.clone())),
            Value::Bool(true) => Some(ErrorMessage::Text("true".to_string())),
            Value::Number(n) => Some(ErrorMessage::Text(format_json_number(n))),
            Value::Array(items) => Some(ErrorMessage::List(
                items.iter().map(list_entry_text).collect(),
            )),
            Value::Object(_) => Some(ErrorMessage::Structured(value.clone())),
        }
    }

    /// Text for the error box.
    pub fn to_display(&self) -> String {
        match self {
            ErrorMessage::Text(text) => text.clone(),
            ErrorMessage::List(lines) => lines.join("\n"),
            ErrorMessage::Structured(value) => value.to_string(),
        }
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display())
    }
}

/// How one element of an `errors` array reads when the list is joined.
fn list_entry_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Number(n) => format_json_number(n),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .map(list_entry_text)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
