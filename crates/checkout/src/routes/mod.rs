//! HTTP route handlers for the checkout service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health        - Liveness check (in main.rs)
//! GET  /health/ready  - Readiness check, verifies Postgres (in main.rs)
//!
//! # Checkout
//! POST /api/checkout  - Create a hosted checkout session for a saved
//!                       configuration; responds with the redirect URL
//! ```

pub mod checkout;

use axum::{Router, routing::post};

use crate::state::AppState;

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/checkout", post(checkout::create_checkout_session))
}

/// Create all routes for the checkout service.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/api", api_routes())
}
