//! # Billing Backend
//!
//! The seam between the session driver and the billing server. The real
//! implementation is [`HttpBackend`](crate::http::HttpBackend); tests plug in
//! in-memory fakes.

use async_trait::async_trait;
use billing_core::{BillReceipt, CalculateTotalRequest, GenerateBillRequest, TotalsResult};
use url::Url;

use crate::error::ClientResult;

/// What the billing counter needs from its server.
#[async_trait]
pub trait BillingBackend: Send + Sync {
    /// `POST api/calculate-total/`
    async fn calculate_total(&self, request: &CalculateTotalRequest) -> ClientResult<TotalsResult>;

    /// `POST api/generate-bill/`
    async fn generate_bill(&self, request: &GenerateBillRequest) -> ClientResult<BillReceipt>;

    /// `GET api/denominations-list/`, highest face value first.
    async fn fetch_denominations(&self) -> ClientResult<Vec<i64>>;

    /// Resolves a site path such as `/bill/O1/` beneath the server's base URL.
    fn resolve(&self, path: &str) -> ClientResult<Url>;
}
