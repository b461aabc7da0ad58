//! # billing-core: Pure Logic for the Billing Counter
//!
//! This crate is the **heart** of the billing counter client. It owns the
//! billing form's state and every rule the cashier can trip over, with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Billing Counter Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Host (terminal, desktop, page)                  │   │
//! │  │    Rows ──► Email ──► Calculate ──► Denominations ──► Bill      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Action                                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ billing-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   form    │  │  tender   │  │   types   │  │ validation│  │   │
//! │  │   │BillingForm│  │ Palette   │  │ LineItem  │  │   rules   │  │   │
//! │  │   │  update() │  │PaidAmount │  │ Requests  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • EFFECTS ARE RETURNED, NOT PERFORMED     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Effect                                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              billing-client (HTTP + session driver)             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`form`] - `BillingForm` controller, `Action`, `Effect`
//! - [`types`] - Wire types (requests, totals, receipts)
//! - [`amount`] - Server-rendered amounts and lenient number parsing
//! - [`tender`] - Denomination palette and paid amount
//! - [`server_error`] - Server error payloads resolved to display text
//! - [`validation`] - Pre-request checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use billing_core::form::{Action, BillingForm, Effect, Field};
//!
//! let mut form = BillingForm::new(&[100, 50]);
//! form.update(Action::EmailChanged("a@b.com".into()));
//! form.update(Action::FieldChanged { row: 0, field: Field::ProductCode, value: "P001".into() });
//!
//! let effect = form.update(Action::CalculateRequested);
//! assert!(matches!(effect, Some(Effect::CalculateTotal(_))));
//! assert!(form.calculate_button().is_disabled());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod amount;
pub mod error;
pub mod form;
pub mod server_error;
pub mod tender;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use amount::DisplayAmount;
pub use error::{CoreError, CoreResult, ValidationError};
pub use form::{Action, BillingForm, Effect, Field, FormPhase};
pub use server_error::ErrorMessage;
pub use tender::DenominationPalette;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Quantity pre-filled in every new product row.
pub const DEFAULT_QUANTITY: i64 = 1;

/// The form never drops below this many product rows.
pub const MIN_PRODUCT_ROWS: usize = 1;

/// Shown when a failure carries no usable error body.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong.";

/// Face values offered when neither config nor server supplies a palette.
pub const DEFAULT_DENOMINATIONS: [i64; 9] = [500, 200, 100, 50, 20, 10, 5, 2, 1];
