//! # PayPal Configuration
//!
//! Configuration management for the PayPal integration.
//! Credentials are loaded from environment variables exactly once at
//! startup; nothing reads ambient state mid-request.

use relay_core::{Currency, GatewayError};
use std::env;

/// Which PayPal host the gateway talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayPalEnvironment {
    Sandbox,
    Live,
}

impl PayPalEnvironment {
    pub fn parse(s: &str) -> Result<Self, GatewayError> {
        match s.to_ascii_lowercase().as_str() {
            "sandbox" => Ok(PayPalEnvironment::Sandbox),
            "live" | "production" => Ok(PayPalEnvironment::Live),
            other => Err(GatewayError::Configuration(format!(
                "PAYPAL_ENVIRONMENT must be 'sandbox' or 'live', got {:?}",
                other
            ))),
        }
    }

    pub fn base_url(&self) -> &'static str {
        match self {
            PayPalEnvironment::Sandbox => "https://api-m.sandbox.paypal.com",
            PayPalEnvironment::Live => "https://api-m.paypal.com",
        }
    }
}

impl std::fmt::Display for PayPalEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PayPalEnvironment::Sandbox => write!(f, "sandbox"),
            PayPalEnvironment::Live => write!(f, "live"),
        }
    }
}

/// PayPal API configuration
#[derive(Debug, Clone)]
pub struct PayPalConfig {
    /// OAuth client id
    pub client_id: String,

    /// OAuth client secret
    pub client_secret: String,

    /// Environment selector (resolves the API host)
    pub environment: PayPalEnvironment,

    /// API base URL (derived from environment, overridable for testing)
    pub api_base_url: String,

    /// Brand name shown on the provider's review page
    pub brand_name: String,

    /// Checkout locale
    pub locale: String,

    /// Currency used when a request does not name one
    pub default_currency: Currency,

    /// Outbound request timeout in seconds
    pub timeout_secs: u64,
}

impl PayPalConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `PAYPAL_CLIENT_ID`
    /// - `PAYPAL_CLIENT_SECRET`
    ///
    /// Optional:
    /// - `PAYPAL_ENVIRONMENT` (sandbox|live, default sandbox)
    /// - `BRAND_NAME` (default "Order Relay")
    /// - `DEFAULT_CURRENCY` (default USD)
    pub fn from_env() -> Result<Self, GatewayError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let client_id = env::var("PAYPAL_CLIENT_ID")
            .map_err(|_| GatewayError::Configuration("PAYPAL_CLIENT_ID not set".to_string()))?;

        let client_secret = env::var("PAYPAL_CLIENT_SECRET").map_err(|_| {
            GatewayError::Configuration("PAYPAL_CLIENT_SECRET not set".to_string())
        })?;

        if client_id.trim().is_empty() || client_secret.trim().is_empty() {
            return Err(GatewayError::Configuration(
                "PayPal credentials must not be empty".to_string(),
            ));
        }

        let environment = match env::var("PAYPAL_ENVIRONMENT") {
            Ok(value) => PayPalEnvironment::parse(&value)?,
            Err(_) => PayPalEnvironment::Sandbox,
        };

        let brand_name =
            env::var("BRAND_NAME").unwrap_or_else(|_| "Order Relay".to_string());

        let default_currency = match env::var("DEFAULT_CURRENCY") {
            Ok(code) => Currency::parse(&code)?,
            Err(_) => Currency::usd(),
        };

        Ok(Self {
            client_id,
            client_secret,
            environment,
            api_base_url: environment.base_url().to_string(),
            brand_name,
            locale: "en-US".to_string(),
            default_currency,
            timeout_secs: 30,
        })
    }

    /// Create config with explicit values (for testing)
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        let environment = PayPalEnvironment::Sandbox;
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            environment,
            api_base_url: environment.base_url().to_string(),
            brand_name: "Order Relay".to_string(),
            locale: "en-US".to_string(),
            default_currency: Currency::usd(),
            timeout_secs: 30,
        }
    }

    pub fn is_live(&self) -> bool {
        self.environment == PayPalEnvironment::Live
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Builder: set the brand name
    pub fn with_brand_name(mut self, name: impl Into<String>) -> Self {
        self.brand_name = name.into();
        self
    }
}
