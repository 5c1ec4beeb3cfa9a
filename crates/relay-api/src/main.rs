//! # Order-Relay
//!
//! Thin HTTP front for a payment provider's order lifecycle.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export PAYPAL_CLIENT_ID=...
//! export PAYPAL_CLIENT_SECRET=...
//! export PAYPAL_ENVIRONMENT=sandbox
//!
//! # Run the server
//! order-relay
//! ```

use relay_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr();
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Payment provider: {}", state.gateway.provider_name());

    // Create router
    let app = routes::create_router(state);

    // Start server
    info!("order-relay starting on http://{}", addr);

    if !is_prod {
        info!("Health: GET http://{}/health", addr);
        info!("Create order: POST http://{}/api/v1/orders", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
