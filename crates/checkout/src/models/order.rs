//! Order record.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A purchase intent for one configuration by one user.
///
/// At most one order exists per (`user_id`, `configuration_id`) pair;
/// repeated checkout attempts reuse the existing row and its amount.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    /// Unique order id.
    pub id: Uuid,
    /// Owning user (identity provider subject id).
    pub user_id: String,
    /// The configuration being purchased.
    pub configuration_id: String,
    /// Amount in decimal currency units (quoted cents / 100).
    pub amount: Decimal,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
}
