//! Stripe REST API client.
//!
//! Speaks Stripe's form-encoded v1 API directly over reqwest. Only the two
//! endpoints the checkout flow needs are implemented: `POST /products` and
//! `POST /checkout/sessions`.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{
    CheckoutSessionSpec, CreatedProduct, HostedCheckout, PaymentError, PaymentProvider,
    ProductSpec,
};
use crate::config::StripeConfig;

/// Stripe API base URL.
const API_BASE: &str = "https://api.stripe.com/v1";

/// Request timeout for Stripe calls.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(15);

/// Stripe API client.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
}

impl StripeClient {
    /// Create a new Stripe API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the secret key is not a valid header value or the
    /// HTTP client fails to build.
    pub fn new(config: &StripeConfig) -> Result<Self, PaymentError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.secret_key.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| PaymentError::Parse(format!("invalid API key format: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert("Authorization", auth_header);

        if let Some(version) = &config.api_version {
            headers.insert(
                "Stripe-Version",
                HeaderValue::from_str(version)
                    .map_err(|e| PaymentError::Parse(format!("invalid API version: {e}")))?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client })
    }

    /// POST a form-encoded request and decode the JSON response.
    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, PaymentError> {
        let url = format!("{API_BASE}{path}");

        let response = self.client.post(&url).form(params).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        response
            .json()
            .await
            .map_err(|e| PaymentError::Parse(e.to_string()))
    }
}

#[async_trait]
impl PaymentProvider for StripeClient {
    async fn create_product(&self, spec: &ProductSpec) -> Result<CreatedProduct, PaymentError> {
        let response: ProductResponse = self.post_form("/products", &product_params(spec)).await?;

        let default_price = response.default_price.ok_or_else(|| {
            PaymentError::InvalidResponse("product has no default price".to_string())
        })?;

        Ok(CreatedProduct {
            id: response.id,
            default_price,
        })
    }

    async fn create_checkout_session(
        &self,
        spec: &CheckoutSessionSpec,
    ) -> Result<HostedCheckout, PaymentError> {
        let response: SessionResponse = self
            .post_form("/checkout/sessions", &session_params(spec))
            .await?;

        let url = response.url.ok_or_else(|| {
            PaymentError::InvalidResponse("checkout session has no redirect URL".to_string())
        })?;

        Ok(HostedCheckout {
            id: response.id,
            url,
        })
    }
}

/// Form parameters for `POST /products`.
fn product_params(spec: &ProductSpec) -> Vec<(String, String)> {
    vec![
        ("name".to_owned(), spec.name.clone()),
        ("images[0]".to_owned(), spec.image_url.clone()),
        (
            "default_price_data[currency]".to_owned(),
            spec.currency.code().to_owned(),
        ),
        (
            "default_price_data[unit_amount]".to_owned(),
            spec.unit_amount_cents.to_string(),
        ),
    ]
}

/// Form parameters for `POST /checkout/sessions`.
fn session_params(spec: &CheckoutSessionSpec) -> Vec<(String, String)> {
    let mut params = vec![
        ("mode".to_owned(), "payment".to_owned()),
        ("success_url".to_owned(), spec.success_url.clone()),
        ("cancel_url".to_owned(), spec.cancel_url.clone()),
        ("payment_method_types[0]".to_owned(), "card".to_owned()),
        ("metadata[userId]".to_owned(), spec.user_id.clone()),
        ("metadata[orderId]".to_owned(), spec.order_id.clone()),
        ("line_items[0][price]".to_owned(), spec.price.clone()),
        ("line_items[0][quantity]".to_owned(), "1".to_owned()),
    ];

    for (i, country) in spec.allowed_shipping_countries.iter().enumerate() {
        params.push((
            format!("shipping_address_collection[allowed_countries][{i}]"),
            country.clone(),
        ));
    }

    params
}

/// Pull the human-readable message out of a Stripe error body.
///
/// Stripe wraps errors as `{"error": {"message": ..., "type": ...}}`; fall
/// back to the raw body when the shape is unexpected.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.to_owned())
}

/// Product resource from the Stripe API.
#[derive(Debug, Deserialize)]
struct ProductResponse {
    id: String,
    default_price: Option<String>,
}

/// Checkout session resource from the Stripe API.
#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
}
