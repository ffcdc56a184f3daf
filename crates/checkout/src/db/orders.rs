//! Order repository for database operations.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::{OrderStore, RepositoryError};
use crate::models::Order;

/// Postgres-backed order store.
#[derive(Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    /// Create a new order store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn find_one(
        &self,
        user_id: &str,
        configuration_id: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(
            r"
            SELECT id, user_id, configuration_id, amount, created_at
            FROM orders
            WHERE user_id = $1 AND configuration_id = $2
            ",
        )
        .bind(user_id)
        .bind(configuration_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    async fn insert(
        &self,
        user_id: &str,
        configuration_id: &str,
        amount: Decimal,
    ) -> Result<Order, RepositoryError> {
        // The UNIQUE (user_id, configuration_id) constraint makes concurrent
        // checkout attempts converge on a single order: the loser of the
        // insert race reads back the winner's row.
        let inserted = sqlx::query_as::<_, Order>(
            r"
            INSERT INTO orders (user_id, configuration_id, amount)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, configuration_id) DO NOTHING
            RETURNING id, user_id, configuration_id, amount, created_at
            ",
        )
        .bind(user_id)
        .bind(configuration_id)
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(order) = inserted {
            return Ok(order);
        }

        self.find_one(user_id, configuration_id)
            .await?
            .ok_or_else(|| {
                RepositoryError::DataCorruption(
                    "order missing after insert conflict".to_string(),
                )
            })
    }
}
