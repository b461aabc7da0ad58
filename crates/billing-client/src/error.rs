//! # Client Error Types
//!
//! Error types for everything that touches the billing server or the
//! config file.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Server              │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Connection     │  │  Server { status,       │ │
//! │  │  InvalidUrl     │  │  DecodeFailed   │  │           message }     │ │
//! │  │  ConfigLoad     │  │  CsrfToken...   │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Only `Server` carries text meant for the cashier. Everything else     │
//! │  reaches the form as "Something went wrong."                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use billing_core::ErrorMessage;
use thiserror::Error;
use tracing::warn;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Every way a request to the billing server can fail.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid client configuration.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// Base URL or endpoint could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    // =========================================================================
    // CSRF Errors
    // =========================================================================
    /// The billing form page carried no `csrfmiddlewaretoken` field.
    #[error("No CSRF token found on {url}")]
    CsrfTokenMissing { url: String },

    /// The token cannot be sent as a header value.
    #[error("CSRF token is not a valid header value")]
    InvalidCsrfToken,

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The request never got a response.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A success response whose body was not what the endpoint promises.
    #[error("Failed to decode response: {0}")]
    DecodeFailed(String),

    // =========================================================================
    // Server Errors
    // =========================================================================
    /// Non-success status; the body has been resolved to display text.
    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: ErrorMessage },
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::DecodeFailed(err.to_string())
        } else {
            ClientError::ConnectionFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::DecodeFailed(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
        )
    }

    /// Converts the failure into what the form's error box shows.
    ///
    /// Server errors keep their resolved message; every other failure is
    /// logged and shown as the generic message.
    pub fn into_error_message(self) -> ErrorMessage {
        match self {
            ClientError::Server { message, .. } => message,
            other => {
                warn!(error = %other, "Request failed without a server message");
                ErrorMessage::generic()
            }
        }
    }
}
