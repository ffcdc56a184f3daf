//! Application state shared across handlers.

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::config::CheckoutConfig;
use crate::db::configurations::PgConfigurationStore;
use crate::db::orders::PgOrderStore;
use crate::db::users::PgUserStore;
use crate::payments::{PaymentError, StripeClient};
use crate::services::{CheckoutService, CheckoutSettings};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and the checkout service.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CheckoutConfig,
    pool: PgPool,
    checkout: CheckoutService,
}

impl AppState {
    /// Create a new application state over Postgres stores and Stripe.
    ///
    /// # Errors
    ///
    /// Returns an error if the Stripe client cannot be built from the
    /// configured credentials.
    pub fn new(config: CheckoutConfig, pool: PgPool) -> Result<Self, PaymentError> {
        let stripe = StripeClient::new(&config.stripe)?;
        let settings = CheckoutSettings::from_config(&config);

        let checkout = CheckoutService::new(
            Arc::new(PgConfigurationStore::new(pool.clone())),
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgOrderStore::new(pool.clone())),
            Arc::new(stripe),
            settings,
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                checkout,
            }),
        })
    }

    /// Get a reference to the checkout configuration.
    #[must_use]
    pub fn config(&self) -> &CheckoutConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the checkout service.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }
}

impl FromRef<AppState> for CheckoutService {
    fn from_ref(state: &AppState) -> Self {
        state.inner.checkout.clone()
    }
}
