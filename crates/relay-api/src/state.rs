//! # Application State
//!
//! Shared state for the Axum application: the configured order gateway and
//! server settings, built once at startup.

use relay_core::{BoxedOrderGateway, ReturnUrls};
use relay_paypal::PayPalGateway;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Base URL for return/cancel links
    pub base_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            base_url: std::env::var("BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Configured order gateway
    pub gateway: BoxedOrderGateway,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState with the PayPal gateway
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let urls = ReturnUrls::new(&config.base_url);

        let gateway = PayPalGateway::from_env(urls)
            .map_err(|e| anyhow::anyhow!("Failed to initialize PayPal gateway: {}", e))?;

        Ok(Self {
            gateway: Arc::new(gateway) as BoxedOrderGateway,
            config,
        })
    }

    /// Build state around an explicit gateway (used by tests)
    pub fn with_gateway(gateway: BoxedOrderGateway, config: AppConfig) -> Self {
        Self { gateway, config }
    }
}
