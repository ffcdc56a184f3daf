//! Checkout route handler.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::CheckoutError;
use crate::middleware::OptionalAuth;
use crate::services::CheckoutService;

/// Checkout request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutRequest {
    /// Id of the saved configuration to purchase.
    pub config_id: String,
}

/// Checkout response body.
#[derive(Debug, Serialize)]
pub struct CreateCheckoutResponse {
    /// Provider-hosted payment page to redirect the caller to.
    pub url: String,
}

/// Create a hosted checkout session for a saved configuration.
///
/// A missing or malformed body is reported as 400 with a JSON error body,
/// like every other failure in the flow.
#[instrument(skip_all)]
pub async fn create_checkout_session(
    State(service): State<CheckoutService>,
    OptionalAuth(identity): OptionalAuth,
    payload: Result<Json<CreateCheckoutRequest>, JsonRejection>,
) -> Result<Json<CreateCheckoutResponse>, CheckoutError> {
    let Json(request) = payload.map_err(|e| CheckoutError::InvalidRequest(e.body_text()))?;

    let session = service
        .create_session(&request.config_id, identity.as_ref())
        .await?;

    Ok(Json(CreateCheckoutResponse { url: session.url }))
}
