//! # Routes
//!
//! Axum router configuration for the order-relay API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - POST /api/v1/orders - Create order (hosted, card, or vaulted flow)
/// - POST /api/v1/orders/{order_id}/capture - Capture an order
/// - POST /api/v1/authorizations/{authorization_id}/capture - Capture an authorization
/// - POST /api/v1/captures/{capture_id}/refund - Refund a capture
/// - GET  /api/v1/orders/{order_id} - Provider order passthrough
/// - GET  /api/v1/captures/{capture_id} - Provider capture passthrough
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - callers are trusted services, not browsers,
    // but preflight still has to succeed for dashboard tooling
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Order lifecycle
        .route("/orders", post(handlers::create_order))
        .route("/orders/{order_id}", get(handlers::get_order))
        .route("/orders/{order_id}/capture", post(handlers::capture_order))
        // Authorizations are a distinct provider resource from orders
        .route(
            "/authorizations/{authorization_id}/capture",
            post(handlers::capture_authorization),
        )
        // Captures
        .route("/captures/{capture_id}", get(handlers::get_capture))
        .route(
            "/captures/{capture_id}/refund",
            post(handlers::refund_capture),
        );

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // API v1
        .nest("/api/v1", api_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
