//! # relay-core
//!
//! Core types and traits for the order-relay payment gateway.
//!
//! This crate provides:
//! - `OrderGateway` trait for implementing payment providers
//! - `OrderRequest` validation and authoritative total recomputation
//! - `Amount` / `Currency` for exact decimal-string money handling
//! - Normalized `Order`, `CaptureResult`, and `RefundResult` shapes
//! - `GatewayError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use relay_core::{OrderGateway, OrderRequest, PaymentSource};
//!
//! // Build a request for the hosted redirect flow
//! let request = OrderRequest {
//!     amount: Some("24.99".to_string()),
//!     currency: Some("USD".to_string()),
//!     description: Some("Annual plan".to_string()),
//!     ..Default::default()
//! };
//!
//! // Create the order through a gateway implementation
//! let order = gateway.create_order(&request).await?;
//!
//! // Redirect the user to order.approval_url
//! ```

pub mod error;
pub mod gateway;
pub mod money;
pub mod order;

// Re-exports for convenience
pub use error::{GatewayError, GatewayResult};
pub use gateway::{BoxedOrderGateway, OrderGateway, ReturnUrls};
pub use money::{Amount, Currency};
pub use order::{
    BillingAddress, CaptureOptions, CaptureResult, CaptureStatus, CardDetails, FeeBreakdown,
    Order, OrderItem, OrderLink, OrderRequest, OrderStatus, PayerIdentity, PaymentSource,
    RefundOptions, RefundResult, ResolvedItem, ResolvedOrder,
};
