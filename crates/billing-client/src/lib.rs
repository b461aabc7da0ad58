//! # billing-client: Billing Server Access
//!
//! Runs the effects the billing form asks for against a real billing server.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Client Architecture                              │
//! │                                                                         │
//! │   ┌───────────────────────────────────────────────────────────────┐     │
//! │   │                    BillingSession<B>                          │     │
//! │   │   BillingForm (billing-core) + B: BillingBackend              │     │
//! │   └──────────────────────────────┬────────────────────────────────┘     │
//! │                                  │                                      │
//! │   ┌──────────────────────────────▼────────────────────────────────┐     │
//! │   │                      HttpBackend                              │     │
//! │   │   reqwest client ── cookie jar ── X-CSRFToken header          │     │
//! │   └──────────────────────────────┬────────────────────────────────┘     │
//! │                                  │                                      │
//! │            POST api/calculate-total/   POST api/generate-bill/          │
//! │            GET  api/denominations-list/                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - TOML + environment configuration
//! - [`backend`] - The `BillingBackend` seam
//! - [`http`] - reqwest implementation
//! - [`csrf`] - CSRF token scraping
//! - [`session`] - Effect-running session driver
//! - [`error`] - Client error types

pub mod backend;
pub mod config;
pub mod csrf;
pub mod error;
pub mod http;
pub mod session;

pub use backend::BillingBackend;
pub use config::{ClientConfig, DenominationSettings, ServerSettings};
pub use csrf::CsrfToken;
pub use error::{ClientError, ClientResult};
pub use http::HttpBackend;
pub use session::BillingSession;
