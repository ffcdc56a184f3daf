//! Payment session orchestration.
//!
//! Composes the stores, pricing table, and payment provider into the single
//! checkout sequence: validate the request, resolve the configuration,
//! authenticate, provision the user, quote the price, get-or-create the
//! order, then hand off to the provider for a hosted payment page. Every
//! step is sequential and the first failure surfaces immediately; nothing
//! is retried internally.

use std::sync::Arc;

use tracing::instrument;

use caseforge_core::CurrencyCode;

use crate::config::CheckoutConfig;
use crate::db::{ConfigurationStore, OrderStore, UserStore};
use crate::error::CheckoutError;
use crate::models::CurrentUser;
use crate::payments::{CheckoutSessionSpec, HostedCheckout, PaymentProvider, ProductSpec};
use crate::pricing::{PriceTable, amount_from_cents};

/// Checkout behavior knobs, extracted from the application config.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    /// Public base URL used to build the success/cancel redirects.
    pub base_url: String,
    /// Currency all prices are quoted in.
    pub currency: CurrencyCode,
    /// Pricing rule table.
    pub pricing: PriceTable,
    /// Display name of the one-time purchasable item.
    pub product_name: String,
    /// Countries the provider may collect a shipping address for.
    pub allowed_shipping_countries: Vec<String>,
}

impl CheckoutSettings {
    /// Extract the checkout settings from the application configuration.
    #[must_use]
    pub fn from_config(config: &CheckoutConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            currency: config.currency,
            pricing: config.pricing,
            product_name: config.product_name.clone(),
            allowed_shipping_countries: config.allowed_shipping_countries.clone(),
        }
    }
}

/// The checkout orchestrator.
///
/// Cheaply cloneable; all stores are shared behind `Arc`.
#[derive(Clone)]
pub struct CheckoutService {
    configurations: Arc<dyn ConfigurationStore>,
    users: Arc<dyn UserStore>,
    orders: Arc<dyn OrderStore>,
    payments: Arc<dyn PaymentProvider>,
    settings: CheckoutSettings,
}

impl CheckoutService {
    /// Create a new checkout service over the given stores and provider.
    #[must_use]
    pub fn new(
        configurations: Arc<dyn ConfigurationStore>,
        users: Arc<dyn UserStore>,
        orders: Arc<dyn OrderStore>,
        payments: Arc<dyn PaymentProvider>,
        settings: CheckoutSettings,
    ) -> Self {
        Self {
            configurations,
            users,
            orders,
            payments,
            settings,
        }
    }

    /// Run the checkout sequence for a saved configuration.
    ///
    /// Returns the provider's hosted payment page on success. Repeated calls
    /// for the same (user, configuration) pair converge on one order; only
    /// the provider product and session are created anew per attempt.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if `config_id` is empty
    /// - `ConfigurationNotFound` if no saved configuration matches
    /// - `Unauthenticated` if no identity is present
    /// - `Storage` / `PaymentProvider` for collaborator failures
    #[instrument(skip(self, identity), fields(config_id = %config_id))]
    pub async fn create_session(
        &self,
        config_id: &str,
        identity: Option<&CurrentUser>,
    ) -> Result<HostedCheckout, CheckoutError> {
        let config_id = config_id.trim();
        if config_id.is_empty() {
            return Err(CheckoutError::InvalidRequest(String::new()));
        }

        let configuration = self
            .configurations
            .find_by_id(config_id)
            .await?
            .ok_or_else(|| CheckoutError::ConfigurationNotFound(config_id.to_owned()))?;

        let user = identity.ok_or(CheckoutError::Unauthenticated)?;

        // Ensure the user row exists before hanging an order off of it.
        self.users.upsert(&user.id, &user.email).await?;

        let price_cents = self
            .settings
            .pricing
            .quote(configuration.finish, configuration.material);

        let order = self
            .orders
            .get_or_create(&user.id, &configuration.id, amount_from_cents(price_cents))
            .await?;

        tracing::debug!(order_id = %order.id, price_cents, "order resolved");

        let product = self
            .payments
            .create_product(&ProductSpec {
                name: self.settings.product_name.clone(),
                image_url: configuration.image_url.clone(),
                currency: self.settings.currency,
                unit_amount_cents: price_cents,
            })
            .await?;

        let session = self
            .payments
            .create_checkout_session(&CheckoutSessionSpec {
                price: product.default_price,
                success_url: format!(
                    "{}/thank-you?orderId={}",
                    self.settings.base_url, order.id
                ),
                cancel_url: format!(
                    "{}/configure/preview?id={}",
                    self.settings.base_url, configuration.id
                ),
                allowed_shipping_countries: self.settings.allowed_shipping_countries.clone(),
                user_id: user.id.clone(),
                order_id: order.id.to_string(),
            })
            .await?;

        tracing::info!(
            order_id = %order.id,
            session_id = %session.id,
            "checkout session created"
        );

        Ok(session)
    }
}
