//! # Access Token Provider
//!
//! Client-credentials token exchange with caching. A cached token is reused
//! until five minutes before its expiry; past that, the next caller refreshes
//! it. The cache lives behind an async mutex that is held across the refresh,
//! so concurrent callers share one in-flight exchange instead of racing.

use crate::config::PayPalConfig;
use chrono::{DateTime, Duration, Utc};
use relay_core::{GatewayError, GatewayResult};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Tokens are refreshed this long before their actual expiry
const EXPIRY_SAFETY_MARGIN_SECS: i64 = 300;

/// A bearer token with its absolute expiry
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub bearer: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Whether the token is still usable at `now`, leaving the safety margin
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at - Duration::seconds(EXPIRY_SAFETY_MARGIN_SECS)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct OAuthErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Exchanges client credentials for bearer tokens, with caching
#[derive(Clone)]
pub struct TokenProvider {
    config: PayPalConfig,
    client: Client,
    cache: Arc<Mutex<Option<AccessToken>>>,
}

impl TokenProvider {
    pub fn new(config: PayPalConfig, client: Client) -> Self {
        Self {
            config,
            client,
            cache: Arc::new(Mutex::new(None)),
        }
    }

    /// Return a valid bearer token, exchanging credentials only when the
    /// cached one is missing or within the safety margin of expiry.
    pub async fn access_token(&self) -> GatewayResult<String> {
        let mut cache = self.cache.lock().await;

        if let Some(token) = cache.as_ref() {
            if token.is_valid_at(Utc::now()) {
                debug!("Reusing cached access token");
                return Ok(token.bearer.clone());
            }
        }

        let token = self.exchange_credentials().await?;
        let bearer = token.bearer.clone();
        *cache = Some(token);
        Ok(bearer)
    }

    /// Drop the cached token so the next caller performs a fresh exchange
    pub async fn invalidate(&self) {
        *self.cache.lock().await = None;
    }

    async fn exchange_credentials(&self) -> GatewayResult<AccessToken> {
        let url = format!("{}/v1/oauth2/token", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            let parsed: Option<OAuthErrorResponse> = serde_json::from_str(&body).ok();
            let (code, description) = match parsed {
                Some(err) => (
                    err.error,
                    err.error_description
                        .unwrap_or_else(|| format!("HTTP {}", status)),
                ),
                None => (None, format!("HTTP {}: {}", status, body)),
            };
            return Err(GatewayError::Auth { code, description });
        }

        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            GatewayError::Serialization(format!("Failed to parse token response: {}", e))
        })?;

        let expires_at = Utc::now() + Duration::seconds(token.expires_in);
        info!(
            "Exchanged client credentials for access token, expires_at={}",
            expires_at
        );

        Ok(AccessToken {
            bearer: token.access_token,
            expires_at,
        })
    }
}

fn transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Transport(format!("Request timed out: {}", e))
    } else {
        GatewayError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_expiring_in(secs: i64) -> AccessToken {
        AccessToken {
            bearer: "A21AAF-test".to_string(),
            expires_at: Utc::now() + Duration::seconds(secs),
        }
    }

    #[test]
    fn test_token_valid_inside_margin() {
        // A nine-hour token is valid now and stays valid until the last
        // five minutes.
        let token = token_expiring_in(32_400);
        let now = Utc::now();

        assert!(token.is_valid_at(now));
        assert!(token.is_valid_at(now + Duration::seconds(32_400 - 301)));
    }

    #[test]
    fn test_token_stale_within_safety_margin() {
        let token = token_expiring_in(32_400);
        let now = Utc::now();

        // Four minutes before expiry: inside the margin, must refresh
        assert!(!token.is_valid_at(now + Duration::seconds(32_400 - 240)));
        // Past expiry
        assert!(!token.is_valid_at(now + Duration::seconds(32_401)));
    }

    #[tokio::test]
    async fn test_cached_token_reused_without_exchange() {
        // Seed the cache directly; an exchange would hit the (unroutable)
        // sandbox host and fail, so two successful calls prove the cache
        // path made no network call.
        let provider = TokenProvider::new(
            PayPalConfig::new("id", "secret").with_api_base_url("http://127.0.0.1:1"),
            Client::new(),
        );
        *provider.cache.lock().await = Some(token_expiring_in(3600));

        assert_eq!(provider.access_token().await.unwrap(), "A21AAF-test");
        assert_eq!(provider.access_token().await.unwrap(), "A21AAF-test");
    }

    #[tokio::test]
    async fn test_stale_token_forces_exchange() {
        let provider = TokenProvider::new(
            PayPalConfig::new("id", "secret").with_api_base_url("http://127.0.0.1:1"),
            Client::new(),
        );
        *provider.cache.lock().await = Some(token_expiring_in(60));

        // Token is inside the safety margin: the provider must attempt a
        // fresh exchange, which fails as a transport error against the
        // unroutable address.
        let err = provider.access_token().await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
    }

    #[tokio::test]
    async fn test_invalidate_clears_cache() {
        let provider =
            TokenProvider::new(PayPalConfig::new("id", "secret"), Client::new());
        *provider.cache.lock().await = Some(token_expiring_in(3600));

        provider.invalidate().await;
        assert!(provider.cache.lock().await.is_none());
    }
}
