//! # Order Gateway Trait
//!
//! The seam between the HTTP layer and a payment provider implementation.
//! One implementation exists today (PayPal, in `relay-paypal`); the trait
//! keeps the HTTP layer provider-agnostic and testable with a stub.

use crate::error::GatewayResult;
use crate::order::{CaptureOptions, CaptureResult, Order, OrderRequest, RefundOptions, RefundResult};
use async_trait::async_trait;
use std::sync::Arc;

/// Core trait for order-lifecycle operations against a payment provider.
///
/// Implementations never retry; every failure surfaces to the caller with
/// the provider's error payload preserved when available.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Create an order with `intent = CAPTURE`.
    ///
    /// The hosted flow returns an order carrying the approval URL the
    /// caller must redirect the end user to. The direct card flow creates
    /// and immediately captures in one logical operation.
    async fn create_order(&self, request: &OrderRequest) -> GatewayResult<Order>;

    /// Capture a previously created (and, for the hosted flow, approved)
    /// order. A non-`COMPLETED` provider status is a successful call
    /// returning that status, not an error.
    async fn capture_order(
        &self,
        order_id: &str,
        options: &CaptureOptions,
    ) -> GatewayResult<CaptureResult>;

    /// Capture against an authorization, possibly partially.
    /// `final_capture = true` tells the provider no further partial
    /// captures will follow.
    async fn capture_authorization(
        &self,
        authorization_id: &str,
        amount: &str,
        currency: Option<&str>,
        final_capture: bool,
    ) -> GatewayResult<CaptureResult>;

    /// Refund a capture. Omitting the amount refunds the full capture.
    async fn refund_capture(
        &self,
        capture_id: &str,
        options: &RefundOptions,
    ) -> GatewayResult<RefundResult>;

    /// Diagnostic read: the provider's order representation, unmodified.
    async fn get_order(&self, order_id: &str) -> GatewayResult<serde_json::Value>;

    /// Diagnostic read: the provider's capture representation, unmodified.
    async fn get_capture(&self, capture_id: &str) -> GatewayResult<serde_json::Value>;

    /// Provider name (for logging and routing)
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a boxed gateway (dynamic dispatch)
pub type BoxedOrderGateway = Arc<dyn OrderGateway>;

/// Return/cancel URLs for the hosted redirect flow
#[derive(Debug, Clone)]
pub struct ReturnUrls {
    /// Base URL of the fronting application
    pub base_url: String,
    /// Path the provider redirects to after approval
    pub return_path: String,
    /// Path the provider redirects to on cancel
    pub cancel_path: String,
}

impl ReturnUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            return_path: "/checkout/return".to_string(),
            cancel_path: "/checkout/cancel".to_string(),
        }
    }

    pub fn return_url(&self) -> String {
        format!("{}{}", self.base_url, self.return_path)
    }

    pub fn cancel_url(&self) -> String {
        format!("{}{}", self.base_url, self.cancel_path)
    }
}

impl Default for ReturnUrls {
    fn default() -> Self {
        Self::new("http://localhost:8080")
    }
}
