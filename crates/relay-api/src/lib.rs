//! # relay-api
//!
//! HTTP API layer for order-relay.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - REST endpoints for the order lifecycle
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/v1/orders` | Create order |
//! | POST | `/api/v1/orders/{id}/capture` | Capture order |
//! | POST | `/api/v1/authorizations/{id}/capture` | Capture authorization |
//! | POST | `/api/v1/captures/{id}/refund` | Refund capture |
//! | GET | `/api/v1/orders/{id}` | Provider order passthrough |
//! | GET | `/api/v1/captures/{id}` | Provider capture passthrough |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
