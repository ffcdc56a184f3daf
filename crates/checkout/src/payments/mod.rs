//! Payment provider integration.
//!
//! The orchestrator talks to the provider through the [`PaymentProvider`]
//! port; [`stripe::StripeClient`] is the production adapter. Two calls are
//! needed per checkout: register a one-time purchasable product for the
//! configuration, then open a hosted checkout session referencing it.

pub mod stripe;

pub use stripe::StripeClient;

use async_trait::async_trait;
use thiserror::Error;

use caseforge_core::CurrencyCode;

/// Errors that can occur when talking to the payment provider.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status of the provider response.
        status: u16,
        /// Provider-supplied error message.
        message: String,
    },

    /// Failed to parse a provider response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Provider response was well-formed but missing required data.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

/// A one-time purchasable product to register with the provider.
#[derive(Debug, Clone)]
pub struct ProductSpec {
    /// Display name shown on the hosted payment page.
    pub name: String,
    /// Rendered case artwork.
    pub image_url: String,
    /// Currency the price is quoted in.
    pub currency: CurrencyCode,
    /// Price in integer minor currency units.
    pub unit_amount_cents: i64,
}

/// A provider-registered product with its default price reference.
#[derive(Debug, Clone)]
pub struct CreatedProduct {
    /// Provider product id.
    pub id: String,
    /// Reference to the product's default price, used as the line item.
    pub default_price: String,
}

/// Parameters for a hosted checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutSessionSpec {
    /// Price reference of the single line item.
    pub price: String,
    /// Redirect after successful payment, encodes the order id.
    pub success_url: String,
    /// Redirect after cancellation, encodes the configuration id.
    pub cancel_url: String,
    /// Countries the provider may collect a shipping address for.
    pub allowed_shipping_countries: Vec<String>,
    /// Opaque reconciliation metadata: owning user id.
    pub user_id: String,
    /// Opaque reconciliation metadata: order id.
    pub order_id: String,
}

/// A provider-hosted, time-limited payment page.
#[derive(Debug, Clone)]
pub struct HostedCheckout {
    /// Provider session id.
    pub id: String,
    /// Redirect URL for the caller.
    pub url: String,
}

/// Port to the external payment provider.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Register a one-time purchasable product priced at the quoted amount.
    async fn create_product(&self, spec: &ProductSpec) -> Result<CreatedProduct, PaymentError>;

    /// Open a hosted checkout session for a previously created product.
    async fn create_checkout_session(
        &self,
        spec: &CheckoutSessionSpec,
    ) -> Result<HostedCheckout, PaymentError>;
}
