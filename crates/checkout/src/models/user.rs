//! Local user record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A local user, keyed by the identity provider's subject id.
///
/// Created lazily on a user's first checkout. Provisioning never overwrites
/// an existing row, so fields edited elsewhere survive repeat checkouts.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Identity provider subject id.
    pub id: String,
    /// Email address captured at first checkout.
    pub email: String,
    /// When the user was first provisioned.
    pub created_at: DateTime<Utc>,
}
