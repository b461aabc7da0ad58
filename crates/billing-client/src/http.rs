//! # HTTP Backend
//!
//! [`BillingBackend`] over reqwest.
//!
//! ## Request Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  connect()                                                             │
//! │    ├── base_url normalised to end in "/"                               │
//! │    ├── cookie jar enabled                                              │
//! │    └── CSRF token: config value, or scraped from GET <form page>       │
//! │                                                                         │
//! │  every request                                                         │
//! │    ├── URL = base_url + "api/..."                                      │
//! │    ├── X-CSRFToken header                                              │
//! │    └── response                                                        │
//! │          2xx ──► JSON body decoded into the endpoint's type            │
//! │          else ──► ClientError::Server { status, ErrorMessage }         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use billing_core::{
    BillReceipt, CalculateTotalRequest, DenominationList, ErrorMessage, GenerateBillRequest,
    TotalsResult,
};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::backend::BillingBackend;
use crate::config::ClientConfig;
use crate::csrf::{CsrfToken, CSRF_HEADER};
use crate::error::{ClientError, ClientResult};

/// Endpoint paths, relative to the base URL.
pub const CALCULATE_TOTAL_PATH: &str = "api/calculate-total/";
pub const GENERATE_BILL_PATH: &str = "api/generate-bill/";
pub const DENOMINATIONS_PATH: &str = "api/denominations-list/";

/// Talks to one billing server with one CSRF token and one cookie jar.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
    csrf: CsrfToken,
}

impl HttpBackend {
    /// Builds the client and obtains the CSRF token.
    pub async fn connect(config: &ClientConfig) -> ClientResult<Self> {
        let base_url = config.base_url()?;
        let client = Client::builder().cookie_store(true).build()?;

        let csrf = match &config.server.csrf_token {
            Some(token) => {
                debug!("Using configured CSRF token");
                CsrfToken::new(token)?
            }
            None => {
                let form_url = base_url.join(config.server.form_path.trim_start_matches('/'))?;
                Self::scrape_csrf_token(&client, &form_url).await?
            }
        };

        info!(base_url = %base_url, "Billing server ready");
        Ok(HttpBackend {
            client,
            base_url,
            csrf,
        })
    }

    async fn scrape_csrf_token(client: &Client, form_url: &Url) -> ClientResult<CsrfToken> {
        debug!(url = %form_url, "Fetching billing form for CSRF token");

        let response = client.get(form_url.clone()).send().await?;
        let status = response.status();
        let html = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Server {
                status: status.as_u16(),
                message: ErrorMessage::from_response_body(html.as_bytes()),
            });
        }

        CsrfToken::from_form_html(&html).ok_or_else(|| ClientError::CsrfTokenMissing {
            url: form_url.to_string(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn csrf_token(&self) -> &CsrfToken {
        &self.csrf
    }

    fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let url = self.resolve(path)?;
        Ok(self
            .client
            .request(method, url)
            .header(CSRF_HEADER, self.csrf.header_value().clone()))
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        debug!(path, "POST");
        let response = self.request(Method::POST, path)?.json(body).send().await?;
        Self::decode(path, response).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        debug!(path, "GET");
        let response = self.request(Method::GET, path)?.send().await?;
        Self::decode(path, response).await
    }

    /// Decodes a success body, or resolves an error body into its message.
    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> ClientResult<T> {
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = ErrorMessage::from_response_body(&body);
            warn!(path, status = status.as_u16(), message = %message, "Server rejected request");
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl BillingBackend for HttpBackend {
    async fn calculate_total(&self, request: &CalculateTotalRequest) -> ClientResult<TotalsResult> {
        self.post_json(CALCULATE_TOTAL_PATH, request).await
    }

    async fn generate_bill(&self, request: &GenerateBillRequest) -> ClientResult<BillReceipt> {
        self.post_json(GENERATE_BILL_PATH, request).await
    }

    async fn fetch_denominations(&self) -> ClientResult<Vec<i64>> {
        let list: DenominationList = self.get_json(DENOMINATIONS_PATH).await?;

        let mut values = list.data;
        values.sort_unstable_by(|a, b| b.cmp(a));
        Ok(values)
    }

    fn resolve(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

// =============================================================================
// Tests
// =============================================================================
