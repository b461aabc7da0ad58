//! # Validation Module
//!
//! Checks the form runs before it sends anything to the server.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE (client)                                         │
//! │  ├── Email present, at least one product code                          │
//! │  └── Order code known, cash tendered, paid ≥ total                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Billing server                                               │
//! │  ├── Email format, product exists, stock available                     │
//! │  └── Quantity ≥ 1, denomination face values valid                      │
//! │                                                                         │
//! │  Each check stops at the first failure; its message goes to the        │
//! │  error box and no request is sent.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use billing_core::validation::{ensure_payment_covers_total, validate_customer_email};
//!
//! assert!(validate_customer_email("  a@b.com ").is_ok());
//! assert!(ensure_payment_covers_total(100, 110.0).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{DenominationCount, LineItem, OrderCode};
use crate::MIN_PRODUCT_ROWS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Compute Total
// =============================================================================

/// Returns the trimmed email, which must not be empty.
///
/// Format checks are left to the server.
pub fn validate_customer_email(email: &str) -> ValidationResult<&str> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::CustomerEmailRequired);
    }
    Ok(email)
}

/// At least one row must carry a product code.
pub fn require_line_items(items: &[LineItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::NoProducts);
    }
    Ok(())
}

/// Removing a row must leave at least [`MIN_PRODUCT_ROWS`].
pub fn ensure_row_removable(row_count: usize) -> ValidationResult<()> {
    if row_count <= MIN_PRODUCT_ROWS {
        return Err(ValidationError::LastProductRow);
    }
    Ok(())
}

// =============================================================================
// Generate Bill
// =============================================================================

/// A bill needs the order code the total was computed under.
pub fn require_order_code(order_code: Option<&OrderCode>) -> ValidationResult<&OrderCode> {
    order_code
        .filter(|code| !code.is_empty())
        .ok_or(ValidationError::TotalNotCalculated)
}

/// At least one denomination must have been tendered.
pub fn require_denominations(tendered: &[DenominationCount]) -> ValidationResult<()> {
    if tendered.is_empty() {
        return Err(ValidationError::NoDenominations);
    }
    Ok(())
}

/// Cash tendered must cover the displayed total.
///
/// ## Example
/// ```rust
/// use billing_core::validation::ensure_payment_covers_total;
///
/// assert!(ensure_payment_covers_total(110, 110.0).is_ok());
/// assert!(ensure_payment_covers_total(200, 110.0).is_ok());
/// assert!(ensure_payment_covers_total(100, 110.5).is_err());
/// ```
pub fn ensure_payment_covers_total(paid: i64, total: f64) -> ValidationResult<()> {
    // NaN totals never block
    if (paid as f64) < total {
        return Err(ValidationError::InsufficientPayment { paid, total });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
