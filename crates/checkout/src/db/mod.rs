//! Database access for the checkout service.
//!
//! # Tables
//!
//! - `users` - Local users, keyed by identity provider subject id
//! - `configurations` - Saved case configurations (read-only here)
//! - `orders` - Purchase intents, one per (user, configuration)
//! - `sessions` - Tower-sessions storage (managed by the session store)
//!
//! # Stores
//!
//! Each store is a trait so the orchestrator can run against Postgres in
//! production and the in-memory implementations in tests:
//!
//! - [`ConfigurationStore`] / [`configurations::PgConfigurationStore`]
//! - [`UserStore`] / [`users::PgUserStore`]
//! - [`OrderStore`] / [`orders::PgOrderStore`]
//! - [`memory`] - in-memory implementations of all three
//!
//! # Migrations
//!
//! Migrations are stored in `crates/checkout/migrations/` and embedded via
//! `sqlx::migrate!`; the binary runs them at startup.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::models::{Configuration, Order, User};

pub mod configurations;
pub mod memory;
pub mod orders;
pub mod users;

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored value could not be mapped back to a domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Read-only lookup of saved configurations.
#[async_trait]
pub trait ConfigurationStore: Send + Sync {
    /// Look up a configuration by id. `None` means no such configuration.
    async fn find_by_id(&self, id: &str) -> Result<Option<Configuration>, RepositoryError>;
}

/// User provisioning store.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert the user if absent; leave an existing row untouched.
    ///
    /// Provisioning must not overwrite user data that may have been edited
    /// since initial creation, so this is insert-if-absent, not a true upsert.
    async fn upsert(&self, id: &str, email: &str) -> Result<(), RepositoryError>;

    /// Look up a user by id.
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, RepositoryError>;
}

/// Order ledger store.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Find the order for a (user, configuration) pair, if any.
    async fn find_one(
        &self,
        user_id: &str,
        configuration_id: &str,
    ) -> Result<Option<Order>, RepositoryError>;

    /// Insert an order for the pair.
    ///
    /// Implementations must be conflict-safe: if another request created the
    /// order for this pair first, the existing order is returned instead of
    /// a duplicate.
    async fn insert(
        &self,
        user_id: &str,
        configuration_id: &str,
        amount: Decimal,
    ) -> Result<Order, RepositoryError>;

    /// Idempotent get-or-create of the order for a (user, configuration) pair.
    ///
    /// An existing order wins and keeps its stored amount - `amount` is only
    /// used when no order exists yet. Repeated checkout attempts therefore
    /// converge on one order even if the price table has changed since the
    /// first attempt.
    async fn get_or_create(
        &self,
        user_id: &str,
        configuration_id: &str,
        amount: Decimal,
    ) -> Result<Order, RepositoryError> {
        if let Some(existing) = self.find_one(user_id, configuration_id).await? {
            return Ok(existing);
        }
        self.insert(user_id, configuration_id, amount).await
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
