//! # relay-paypal
//!
//! PayPal order-lifecycle gateway for order-relay.
//!
//! This crate provides:
//!
//! 1. **TokenProvider** - OAuth client-credentials exchange with caching
//!    - Tokens reused until 5 minutes before expiry
//!    - Single-flight refresh under concurrency
//!
//! 2. **PayPalGateway** - `OrderGateway` over the Orders/Payments v2 APIs
//!    - Three creation flows: hosted redirect, direct card, vaulted token
//!    - Fresh `PayPal-Request-Id` per write attempt
//!    - Capture, authorization capture, refund, passthrough reads
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use relay_paypal::PayPalGateway;
//! use relay_core::{OrderGateway, OrderRequest, ReturnUrls};
//!
//! // Create gateway from environment
//! let gateway = PayPalGateway::from_env(ReturnUrls::new("https://shop.example.com"))?;
//!
//! // Create an order (hosted flow)
//! let order = gateway.create_order(&OrderRequest {
//!     amount: Some("24.99".into()),
//!     ..Default::default()
//! }).await?;
//!
//! // Redirect the user to order.approval_url, then capture after approval
//! let capture = gateway.capture_order(&order.id, &Default::default()).await?;
//! ```

pub mod client;
pub mod config;
pub mod payload;
pub mod token;

// Re-exports
pub use client::PayPalGateway;
pub use config::{PayPalConfig, PayPalEnvironment};
pub use token::{AccessToken, TokenProvider};
