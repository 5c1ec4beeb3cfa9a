//! # Gateway Error Types
//!
//! Typed error handling for the order-relay gateway.
//! All gateway operations return `Result<T, GatewayError>`.

use thiserror::Error;

/// Core error type for all gateway operations
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Configuration errors (missing credentials, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data (caller-side validation failure)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Token exchange failure (bad credentials, provider auth rejection)
    #[error("Authentication failed: {description}")]
    Auth {
        /// Provider error code (e.g., "invalid_client"), when available
        code: Option<String>,
        description: String,
    },

    /// Provider rejected order creation
    #[error("Order creation failed: {message}")]
    OrderCreation {
        message: String,
        /// Provider's original error payload, preserved for upstream layers
        body: Option<serde_json::Value>,
    },

    /// Provider rejected a capture call
    #[error("Capture failed: {message}")]
    Capture {
        message: String,
        body: Option<serde_json::Value>,
    },

    /// Provider rejected a refund call
    #[error("Refund failed: {message}")]
    Refund {
        message: String,
        body: Option<serde_json::Value>,
    },

    /// Provider rejected a passthrough read or other uncategorized call
    #[error("Provider error: {message}")]
    Provider {
        message: String,
        body: Option<serde_json::Value>,
    },

    /// Network failure or timeout communicating with the provider
    #[error("Transport error: {0}")]
    Transport(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns true if the caller may reasonably retry this operation.
    /// The gateway itself never retries; upstream layers decide.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Transport(_))
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            GatewayError::Configuration(_) => 500,
            GatewayError::InvalidRequest(_) => 400,
            GatewayError::Auth { .. } => 401,
            GatewayError::OrderCreation { .. } => 502,
            GatewayError::Capture { .. } => 502,
            GatewayError::Refund { .. } => 502,
            GatewayError::Provider { .. } => 502,
            GatewayError::Transport(_) => 504,
            GatewayError::Serialization(_) => 500,
            GatewayError::Internal(_) => 500,
        }
    }

    /// Provider error payload, when this error carries one
    pub fn provider_body(&self) -> Option<&serde_json::Value> {
        match self {
            GatewayError::OrderCreation { body, .. }
            | GatewayError::Capture { body, .. }
            | GatewayError::Refund { body, .. }
            | GatewayError::Provider { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(GatewayError::Transport("timeout".into()).is_retryable());
        assert!(!GatewayError::InvalidRequest("bad amount".into()).is_retryable());
        assert!(!GatewayError::Auth {
            code: Some("invalid_client".into()),
            description: "Client Authentication failed".into(),
        }
        .is_retryable());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(GatewayError::InvalidRequest("x".into()).status_code(), 400);
        assert_eq!(
            GatewayError::Auth {
                code: None,
                description: "denied".into()
            }
            .status_code(),
            401
        );
        assert_eq!(GatewayError::Transport("reset".into()).status_code(), 504);
        assert_eq!(
            GatewayError::Capture {
                message: "RESOURCE_NOT_FOUND".into(),
                body: None
            }
            .status_code(),
            502
        );
    }

    #[test]
    fn test_provider_body_preserved() {
        let body = serde_json::json!({"name": "UNPROCESSABLE_ENTITY"});
        let err = GatewayError::OrderCreation {
            message: "rejected".into(),
            body: Some(body.clone()),
        };
        assert_eq!(err.provider_body(), Some(&body));
        assert_eq!(GatewayError::Transport("t".into()).provider_body(), None);
    }
}
