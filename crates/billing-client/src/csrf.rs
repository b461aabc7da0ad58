//! # CSRF Token
//!
//! The billing server rejects POSTs without the token its form page hands
//! out. The token is read once per backend and sent as `X-CSRFToken` on
//! every request; the matching cookie rides along in the client's jar.
//!
//! ```text
//!   GET <base_url><form_path>
//!     Set-Cookie: csrftoken=...                  ──► cookie jar
//!     <input type="hidden" name="csrfmiddlewaretoken" value="T">
//!                                                 ──► CsrfToken("T")
//!   POST api/...
//!     X-CSRFToken: T
//!     Cookie: csrftoken=...
//! ```

use reqwest::header::HeaderValue;

use crate::error::{ClientError, ClientResult};

/// Request header carrying the token.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Hidden form field the server renders the token into.
pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";

/// A CSRF token that is known to be sendable as a header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrfToken {
    text: String,
    header: HeaderValue,
}

impl CsrfToken {
    pub fn new(token: &str) -> ClientResult<Self> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ClientError::InvalidCsrfToken);
        }
        let header = HeaderValue::from_str(token).map_err(|_| ClientError::InvalidCsrfToken)?;

        Ok(CsrfToken {
            text: token.to_string(),
            header,
        })
    }

    /// Reads the token from the billing form page.
    ///
    /// ## Example
    /// ```rust
    /// use billing_client::csrf::CsrfToken;
    ///
    /// let html = r#"<form><input type="hidden" name="csrfmiddlewaretoken" value="abc"></form>"#;
    /// let token = CsrfToken::from_form_html(html).unwrap();
    /// assert_eq!(token.as_str(), "abc");
    /// ```
    pub fn from_form_html(html: &str) -> Option<Self> {
        input_tags(html)
            .filter(|tag| attribute(tag, "name") == Some(CSRF_FIELD))
            .find_map(|tag| attribute(tag, "value"))
            .and_then(|value| CsrfToken::new(value).ok())
    }

    pub fn header_value(&self) -> &HeaderValue {
        &self.header
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

// =============================================================================
// Tag Scanning
// =============================================================================

/// The text inside each `<input ...>` tag.
fn input_tags(html: &str) -> impl Iterator<Item = &str> {
    html.match_indices("<input")
        .filter_map(move |(start, _)| {
            let rest = &html[start + "<input".len()..];
            rest.find('>').map(|end| &rest[..end])
        })
}

/// Value of a quoted (or bare) attribute inside a tag body.
fn attribute<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let mut rest = tag;

    while let Some(pos) = rest.find(name) {
        let preceded_by_space = rest[..pos]
            .chars()
            .next_back()
            .map_or(true, char::is_whitespace);
        let after = rest[pos + name.len()..].trim_start();
        rest = &rest[pos + name.len()..];

        if !preceded_by_space {
            continue;
        }
        let Some(after_eq) = after.strip_prefix('=') else {
            continue;
        };
        let after_eq = after_eq.trim_start();

        return match after_eq.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let body = &after_eq[1..];
                body.find(quote).map(|end| &body[..end])
            }
            Some(_) => {
                let end = after_eq
                    .find(|c: char| c.is_whitespace() || c == '/')
                    .unwrap_or(after_eq.len());
                Some(&after_eq[..end])
            }
            None => None,
        };
    }

    None
}
