//! # Error Types
//!
//! Domain-specific error types for billing-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  billing-core errors (this file)                                       │
//! │  ├── CoreError        - Rejected form operations                       │
//! │  └── ValidationError  - Cashier-facing precondition failures           │
//! │                                                                         │
//! │  billing-core::server_error                                            │
//! │  └── ErrorMessage     - What the server said went wrong                │
//! │                                                                         │
//! │  billing-client errors (separate crate)                                │
//! │  └── ClientError      - Config, CSRF, transport, HTTP status           │
//! │                                                                         │
//! │  Flow: ValidationError ──► error box (Display text, verbatim)           │
//! │        ClientError ──► ErrorMessage ──► error box                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. `ValidationError` messages are shown to the cashier exactly as written
//! 3. Errors are enum variants, never String

use thiserror::Error;

use crate::amount::format_js_number;

// =============================================================================
// Core Error
// =============================================================================

/// Form operations that were rejected.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// A row index that names no product row.
    #[error("Product row {index} does not exist ({rows} rows)")]
    RowNotFound { index: usize, rows: usize },

    /// A face value that is not in the denomination palette.
    #[error("Denomination {value} is not in the palette")]
    UnknownDenomination { value: i64 },

    /// Validation error (wraps ValidationError).
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Precondition failures shown in the form's error box.
///
/// The `Display` text of each variant is the exact message the cashier sees.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    /// Tried to remove the only product row.
    #[error("At least one product is required.")]
    LastProductRow,

    /// Customer email left empty.
    #[error("Customer email is required.")]
    CustomerEmailRequired,

    /// Every row has an empty product code.
    #[error("Add at least one product.")]
    NoProducts,

    /// Generate requested before the server assigned an order code.
    #[error("Please calculate total first.")]
    TotalNotCalculated,

    /// No denomination slot has a positive count.
    #[error("Enter at least one denomination count.")]
    NoDenominations,

    /// Cash tendered does not cover the displayed total.
    ///
    /// ## User Workflow
    /// ```text
    /// Total shown: 110.00
    /// Tendered:    1 × 100
    ///      │
    ///      ▼
    /// InsufficientPayment { paid: 100, total: 110.0 }
    ///      │
    ///      ▼
    /// "Paid amount (100) is less than total amount (110). Please add more denominations."
    /// ```
    #[error(
        "Paid amount ({}) is less than total amount ({}). Please add more denominations.",
        .paid,
        js_total(.total)
    )]
    InsufficientPayment { paid: i64, total: f64 },
}

fn js_total(total: &f64) -> String {
    format_js_number(*total)
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
