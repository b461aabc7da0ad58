//! # Amount Module
//!
//! Server-rendered amounts and the lenient number parsing the form uses on
//! its text inputs.
//!
//! ## Who Owns The Arithmetic?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE SERVER IS THE SOURCE OF TRUTH                                      │
//! │                                                                         │
//! │  Server computes:   total_before_tax, total_tax, total_amount           │
//! │  Client displays:   exactly what the server sent ("110.00" or 110)      │
//! │                                                                         │
//! │  The ONE client-side use of a total:                                    │
//! │    paid_amount (integer) < parse(total_amount) ?  → block the bill      │
//! │                                                                         │
//! │  No rounding, no tax math, no currency formatting happens here.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Lenient Parsing
//! Form inputs are free text. Counts and quantities take the leading integer
//! prefix (`"2 pcs"` → 2, `"abc"` → none); totals take the leading decimal
//! prefix (`"110.00"` → 110.0). Callers substitute 0 for "none".

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Display Amount
// =============================================================================

/// A monetary value exactly as the billing server rendered it.
///
/// The server may send amounts as JSON strings (`"110.00"`) or numbers
/// (`110`). Both become display text; numbers are rendered the way a browser
/// renders them (`100`, `62.5`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayAmount(String);

impl DisplayAmount {
    /// Wraps server text without touching it.
    pub fn new(text: impl Into<String>) -> Self {
        DisplayAmount(text.into())
    }

    /// Returns the text shown to the cashier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the leading decimal number, treating unparsable text as 0.
    ///
    /// ## Example
    /// ```rust
    /// use billing_core::DisplayAmount;
    ///
    /// assert_eq!(DisplayAmount::new("110.00").to_f64_lenient(), 110.0);
    /// assert_eq!(DisplayAmount::new("n/a").to_f64_lenient(), 0.0);
    /// ```
    pub fn to_f64_lenient(&self) -> f64 {
        parse_float_prefix(&self.0).unwrap_or(0.0)
    }
}

impl fmt::Display for DisplayAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DisplayAmount {
    fn from(text: &str) -> Self {
        DisplayAmount::new(text)
    }
}

impl Serialize for DisplayAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Wire shapes the server uses for an amount.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Text(String),
    Number(serde_json::Number),
}

impl<'de> Deserialize<'de> for DisplayAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawAmount::deserialize(deserializer)? {
            RawAmount::Text(text) => DisplayAmount(text),
            RawAmount::Number(number) => DisplayAmount(format_json_number(&number)),
        })
    }
}

// =============================================================================
// Number Rendering
// =============================================================================

/// Renders a JSON number the way a browser would print it.
pub fn format_json_number(number: &serde_json::Number) -> String {
    if let Some(i) = number.as_i64() {
        return i.to_string();
    }
    if let Some(u) = number.as_u64() {
        return u.to_string();
    }
    number
        .as_f64()
        .map(format_js_number)
        .unwrap_or_else(|| number.to_string())
}

/// Renders a float the way a browser would print it (`110`, not `110.0`).
pub fn format_js_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if value == 0.0 {
        // Covers -0.0 as well
        "0".to_string()
    } else {
        format!("{}", value)
    }
}

// =============================================================================
// Lenient Parsing
// =============================================================================

/// Parses the leading integer of `text` (`" 12abc"` → 12).
///
/// Returns `None` when no digit follows the optional sign, or when the digits
/// overflow `i64`.
///
/// ## Example
/// ```rust
/// use billing_core::amount::parse_int_prefix;
///
/// assert_eq!(parse_int_prefix("2"), Some(2));
/// assert_eq!(parse_int_prefix("1.9"), Some(1));
/// assert_eq!(parse_int_prefix(""), None);
/// ```
pub fn parse_int_prefix(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }

    text[..end].parse().ok()
}

/// Parses the leading decimal number of `text` (`"110.00 INR"` → 110.0).
///
/// Accepts an optional sign, digits with at most one decimal point, and an
/// exponent only when digits follow it.
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    if text[end..].starts_with("Infinity") {
        let sign = if bytes.first() == Some(&b'-') { -1.0 } else { 1.0 };
        return Some(sign * f64::INFINITY);
    }

    let mut mantissa_digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        mantissa_digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac = end + 1;
        while frac < bytes.len() && bytes[frac].is_ascii_digit() {
            frac += 1;
            mantissa_digits += 1;
        }
        if mantissa_digits > 0 {
            end = frac;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        let exp_digits_start = exp;
        while exp < bytes.len() && bytes[exp].is_ascii_digit() {
            exp += 1;
        }
        if exp > exp_digits_start {
            end = exp;
        }
    }

    text[..end].parse().ok()
}

// =============================================================================
// Unit Tests
// =============================================================================
