//! # Billing Session
//!
//! Drives one [`BillingForm`] against one [`BillingBackend`].
//!
//! ## Dispatch Cycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  dispatch(action)                                                      │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  form.update(action) ──► Effect::CalculateTotal ──► backend ──┐        │
//! │                          Effect::GenerateBill   ──► backend ──┤        │
//! │                          Effect::Navigate(path) ──► resolve   │        │
//! │                                                               │        │
//! │  form.update(TotalCalculated / BillGenerated) ◄───────────────┘        │
//! │    │                                                                    │
//! │    ▼                                                                    │
//! │  returns once no effect is left                                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A dispatch only returns after the server has answered and the answer has
//! been applied, so the host never reads the next command while a button is
//! busy.

use billing_core::{Action, BillingForm, Effect};
use tracing::{error, info, info_span, warn, Instrument};
use url::Url;
use uuid::Uuid;

use crate::backend::BillingBackend;
use crate::config::DenominationSettings;
use crate::error::{ClientError, ClientResult};

/// One cashier's pass through the billing form.
pub struct BillingSession<B: BillingBackend> {
    id: Uuid,
    form: BillingForm,
    backend: B,
    location: Option<Url>,
}

impl<B: BillingBackend> BillingSession<B> {
    /// Starts a session with a fixed palette.
    pub fn new(backend: B, denominations: &[i64]) -> Self {
        let id = Uuid::new_v4();
        info!(session_id = %id, "Billing session started");

        BillingSession {
            id,
            form: BillingForm::new(denominations),
            backend,
            location: None,
        }
    }

    /// Starts a session, asking the server for the palette when enabled.
    ///
    /// Falls back to the configured values when the server list is disabled,
    /// empty, or unavailable.
    pub async fn start(backend: B, settings: &DenominationSettings) -> Self {
        let values = if settings.fetch_from_server {
            match backend.fetch_denominations().await {
                Ok(values) if !values.is_empty() => values,
                Ok(_) => {
                    warn!("Server sent no denominations, using configured palette");
                    settings.values.clone()
                }
                Err(e) => {
                    warn!(error = %e, "Failed to fetch denominations, using configured palette");
                    settings.values.clone()
                }
            }
        } else {
            settings.values.clone()
        };

        Self::new(backend, &values)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn form(&self) -> &BillingForm {
        &self.form
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The bill page, once a bill has been generated.
    pub fn location(&self) -> Option<&Url> {
        self.location.as_ref()
    }

    /// Applies one action and runs every effect it leads to.
    ///
    /// Returns the bill page when this action completed the bill. Fails only
    /// when the bill exists but its page cannot be addressed; the form has
    /// navigated by then, so the host should stop.
    pub async fn dispatch(&mut self, action: Action) -> ClientResult<Option<Url>> {
        let span = info_span!("dispatch", session_id = %self.id);
        self.run(action).instrument(span).await
    }

    async fn run(&mut self, action: Action) -> ClientResult<Option<Url>> {
        let mut next = self.form.update(action);

        while let Some(effect) = next.take() {
            next = match effect {
                Effect::CalculateTotal(request) => {
                    let result = self
                        .backend
                        .calculate_total(&request)
                        .await
                        .map_err(ClientError::into_error_message);
                    self.form.update(Action::TotalCalculated(result))
                }
                Effect::GenerateBill(request) => {
                    let result = self
                        .backend
                        .generate_bill(&request)
                        .await
                        .map_err(ClientError::into_error_message);
                    self.form.update(Action::BillGenerated(result))
                }
                Effect::Navigate(path) => {
                    let url = self.backend.resolve(&path).map_err(|e| {
                        error!(path = %path, error = %e, "Could not resolve bill page");
                        e
                    })?;
                    info!(url = %url, "Navigating to bill");
                    self.location = Some(url.clone());
                    return Ok(Some(url));
                }
            };
        }

        Ok(None)
    }
}

// =============================================================================
// Tests
// =============================================================================
