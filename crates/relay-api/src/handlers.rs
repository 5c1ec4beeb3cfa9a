//! # Request Handlers
//!
//! Axum request handlers for the order-relay API. Each handler maps the
//! inbound JSON onto a gateway operation and relays the normalized result;
//! the gateway never retries, so status codes mirror its error taxonomy.

use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use relay_core::{CaptureOptions, CaptureResult, GatewayError, Order, OrderRequest, RefundOptions, RefundResult};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Authorization capture request body
#[derive(Debug, Deserialize)]
pub struct AuthorizationCaptureRequest {
    /// Amount to capture, as a decimal string
    pub amount: String,
    /// Currency code (falls back to the configured default)
    #[serde(default)]
    pub currency: Option<String>,
    /// Whether further partial captures may follow
    #[serde(default = "default_final_capture")]
    pub final_capture: bool,
}

fn default_final_capture() -> bool {
    true
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    /// The provider's original error payload, when one was preserved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            provider: None,
        }
    }
}

fn gateway_error_to_response(err: GatewayError) -> (StatusCode, Json<ErrorResponse>) {
    let code = err.status_code();
    let response = ErrorResponse {
        error: err.to_string(),
        code,
        provider: err.provider_body().cloned(),
    };
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "order-relay",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create an order (hosted redirect, direct card, or vaulted token flow)
#[instrument(skip(state, request), fields(items = request.items.len()))]
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<OrderRequest>,
) -> Result<(StatusCode, Json<Order>), HandlerError> {
    let order = state.gateway.create_order(&request).await.map_err(|e| {
        error!("Failed to create order: {}", e);
        gateway_error_to_response(e)
    })?;

    info!("Created order: id={}, status={}", order.id, order.status);
    Ok((StatusCode::CREATED, Json(order)))
}

/// Capture a previously created order
#[instrument(skip(state, options), fields(order_id = %order_id))]
pub async fn capture_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    options: Option<Json<CaptureOptions>>,
) -> Result<Json<CaptureResult>, HandlerError> {
    let options = options.map(|Json(o)| o).unwrap_or_default();

    let result = state
        .gateway
        .capture_order(&order_id, &options)
        .await
        .map_err(|e| {
            error!("Failed to capture order {}: {}", order_id, e);
            gateway_error_to_response(e)
        })?;

    info!(
        "Captured order {}: capture_id={}, status={}",
        order_id, result.capture_id, result.status
    );
    Ok(Json(result))
}

/// Capture against an authorization, possibly partially
#[instrument(skip(state, request), fields(authorization_id = %authorization_id))]
pub async fn capture_authorization(
    State(state): State<AppState>,
    Path(authorization_id): Path<String>,
    Json(request): Json<AuthorizationCaptureRequest>,
) -> Result<Json<CaptureResult>, HandlerError> {
    let result = state
        .gateway
        .capture_authorization(
            &authorization_id,
            &request.amount,
            request.currency.as_deref(),
            request.final_capture,
        )
        .await
        .map_err(|e| {
            error!(
                "Failed to capture authorization {}: {}",
                authorization_id, e
            );
            gateway_error_to_response(e)
        })?;

    Ok(Json(result))
}

/// Refund a capture (full when no amount is supplied, partial otherwise)
#[instrument(skip(state, options), fields(capture_id = %capture_id))]
pub async fn refund_capture(
    State(state): State<AppState>,
    Path(capture_id): Path<String>,
    options: Option<Json<RefundOptions>>,
) -> Result<Json<RefundResult>, HandlerError> {
    let options = options.map(|Json(o)| o).unwrap_or_default();

    let result = state
        .gateway
        .refund_capture(&capture_id, &options)
        .await
        .map_err(|e| {
            error!("Failed to refund capture {}: {}", capture_id, e);
            gateway_error_to_response(e)
        })?;

    info!(
        "Refunded capture {}: refund_id={}, status={}",
        capture_id, result.refund_id, result.status
    );
    Ok(Json(result))
}

/// Passthrough read of the provider's order representation
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<serde_json::Value>, HandlerError> {
    let order = state
        .gateway
        .get_order(&order_id)
        .await
        .map_err(gateway_error_to_response)?;
    Ok(Json(order))
}

/// Passthrough read of the provider's capture representation
pub async fn get_capture(
    State(state): State<AppState>,
    Path(capture_id): Path<String>,
) -> Result<Json<serde_json::Value>, HandlerError> {
    let capture = state
        .gateway
        .get_capture(&capture_id)
        .await
        .map_err(gateway_error_to_response)?;
    Ok(Json(capture))
}
