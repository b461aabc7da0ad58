//! # App Error Type
//!
//! Failures of the terminal session. Mistyped commands are reported inline
//! and the session carries on; everything else ends it.

use billing_client::ClientError;
use thiserror::Error;

use crate::commands::CommandError;

/// Errors surfaced by [`run`](crate::run).
#[derive(Debug, Error)]
pub enum AppError {
    /// A command line that could not be understood.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Reading stdin or writing stdout failed.
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration or start-up request to the billing server failed.
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Exit status for a bad config file, flag, or environment value (`EX_CONFIG`).
pub const EXIT_CONFIG: u8 = 78;

impl AppError {
    /// Returns true if the session cannot continue after this error.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, AppError::Command(_))
    }

    /// Process exit status for a session that ended with this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Client(e) if e.is_config_error() => EXIT_CONFIG,
            _ => 1,
        }
    }
}
