//! # Client Configuration
//!
//! Where the billing server lives and which denominations the counter offers.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     BILLING_BASE_URL=https://shop.example.com/                         │
//! │     BILLING_CSRF_TOKEN=abc123                                          │
//! │     BILLING_FETCH_DENOMINATIONS=false                                  │
//! │     BILLING_DENOMINATIONS=500,200,100,50                               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/counter/billing.toml (Linux)                             │
//! │     ~/Library/Application Support/com.billing.counter/billing.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://127.0.0.1:8000/, palette fetched from the server            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # billing.toml
//! [server]
//! base_url = "http://127.0.0.1:8000/"
//! # csrf_token = "..."   # skip scraping the billing form page
//! form_path = ""         # page carrying the csrfmiddlewaretoken field
//!
//! [denominations]
//! values = [500, 200, 100, 50, 20, 10, 5, 2, 1]
//! fetch_from_server = true
//! ```

use billing_core::DEFAULT_DENOMINATIONS;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Server Settings
// =============================================================================

/// How to reach the billing server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Root of the billing site; the API lives under `api/`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Fixed CSRF token. When unset the token is scraped from the form page.
    #[serde(default)]
    pub csrf_token: Option<String>,

    /// Billing form page, relative to `base_url`.
    #[serde(default)]
    pub form_path: String,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000/".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            base_url: default_base_url(),
            csrf_token: None,
            form_path: String::new(),
        }
    }
}

// =============================================================================
// Denomination Settings
// =============================================================================

/// The note/coin palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenominationSettings {
    /// Face values used when the server list is disabled or unavailable.
    #[serde(default = "default_denominations")]
    pub values: Vec<i64>,

    /// Ask `GET api/denominations-list/` for the palette at start-up.
    #[serde(default = "default_true")]
    pub fetch_from_server: bool,
}

fn default_denominations() -> Vec<i64> {
    DEFAULT_DENOMINATIONS.to_vec()
}

fn default_true() -> bool {
    true
}

impl Default for DenominationSettings {
    fn default() -> Self {
        DenominationSettings {
            values: default_denominations(),
            fetch_from_server: true,
        }
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub denominations: DenominationSettings,
}

impl ClientConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (billing.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading billing config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a config file body; missing sections take their defaults.
    pub fn from_toml(contents: &str) -> ClientResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        self.base_url()?;

        let values = &self.denominations.values;
        if values.is_empty() {
            return Err(ClientError::InvalidConfig(
                "denominations.values must not be empty".into(),
            ));
        }
        if let Some(bad) = values.iter().find(|value| **value <= 0) {
            return Err(ClientError::InvalidConfig(format!(
                "Denomination values must be positive, got: {}",
                bad
            )));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = values.iter().find(|value| !seen.insert(**value)) {
            return Err(ClientError::InvalidConfig(format!(
                "Duplicate denomination value: {}",
                dup
            )));
        }

        Ok(())
    }

    /// The parsed base URL, always ending in `/` so relative endpoints
    /// resolve beneath it.
    pub fn base_url(&self) -> ClientResult<Url> {
        let mut url = Url::parse(self.server.base_url.trim())?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "Base URL must start with http:// or https://, got: {}",
                self.server.base_url
            )));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(url)
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Base URL
        if let Some(url) = lookup("BILLING_BASE_URL") {
            debug!(url = %url, "Overriding base URL from environment");
            self.server.base_url = url;
        }

        // CSRF token
        if let Some(token) = lookup("BILLING_CSRF_TOKEN") {
            debug!("Overriding CSRF token from environment");
            self.server.csrf_token = Some(token);
        }

        // Server palette
        if let Some(flag) = lookup("BILLING_FETCH_DENOMINATIONS") {
            match flag.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.denominations.fetch_from_server = true,
                "0" | "false" | "no" | "off" => self.denominations.fetch_from_server = false,
                _ => warn!(value = %flag, "Unknown BILLING_FETCH_DENOMINATIONS value"),
            }
        }

        // Fallback palette
        if let Some(list) = lookup("BILLING_DENOMINATIONS") {
            let parsed: Result<Vec<i64>, _> = list
                .split(',')
                .map(|value| value.trim().parse::<i64>())
                .collect();
            match parsed {
                Ok(values) => self.denominations.values = values,
                Err(e) => warn!(value = %list, error = %e, "Ignoring BILLING_DENOMINATIONS"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "billing", "counter")
            .map(|dirs| dirs.config_dir().join("billing.toml"))
    }
}
