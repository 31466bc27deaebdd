use crate::error::{OrderError, Result};
use std::time::Duration;

/// Base URL of the PayPal sandbox REST API.
pub const PAYPAL_SANDBOX_URL: &str = "https://api-m.sandbox.paypal.com";

/// Credentials and transport settings for the PayPal REST API.
#[derive(Debug, Clone)]
pub struct PayPalConfig {
    pub client_id: String,
    pub app_secret: String,
    /// API base URL, without a trailing slash.
    pub api_url: String,
    /// Per-request timeout; a stalled call fails instead of hanging the checkout.
    pub timeout: Duration,
}

impl PayPalConfig {
    pub fn new(client_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            app_secret: app_secret.into(),
            api_url: PAYPAL_SANDBOX_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Create config from environment variables.
    ///
    /// - `PAYPAL_CLIENT_ID`: Required client id
    /// - `PAYPAL_APP_SECRET`: Required client secret
    /// - `PAYPAL_API_URL`: Optional base URL (default: sandbox)
    /// - `PAYPAL_TIMEOUT_SECS`: Optional timeout in seconds (default: 30)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`PayPalConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| OrderError::ConfigError(format!("{key} not set")))
        };
        let mut config = Self::new(required("PAYPAL_CLIENT_ID")?, required("PAYPAL_APP_SECRET")?);

        if let Some(url) = lookup("PAYPAL_API_URL") {
            config = config.with_api_url(url);
        }
        if let Some(secs) = lookup("PAYPAL_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                OrderError::ConfigError(format!("PAYPAL_TIMEOUT_SECS is not a number: {secs}"))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config.validate()?;
        Ok(config)
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() || self.app_secret.trim().is_empty() {
            return Err(OrderError::ConfigError(
                "PayPal credentials must not be empty".to_string(),
            ));
        }
        if self.api_url.is_empty() {
            return Err(OrderError::ConfigError("PayPal API URL not configured".to_string()));
        }
        Ok(())
    }
}
