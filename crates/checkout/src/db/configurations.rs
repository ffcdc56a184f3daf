//! Configuration repository for database operations.
//!
//! Configurations are created by the design flow; this service only reads
//! them. Option columns are stored as lowercase TEXT and parsed back into
//! their enums here; an unparseable value is reported as data corruption.

use async_trait::async_trait;
use sqlx::PgPool;

use caseforge_core::{Finish, Material};

use super::{ConfigurationStore, RepositoryError};
use crate::models::Configuration;

/// Postgres-backed configuration store.
#[derive(Clone)]
pub struct PgConfigurationStore {
    pool: PgPool,
}

impl PgConfigurationStore {
    /// Create a new configuration store.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ConfigurationRow {
    id: String,
    finish: String,
    material: String,
    image_url: String,
}

impl TryFrom<ConfigurationRow> for Configuration {
    type Error = RepositoryError;

    fn try_from(row: ConfigurationRow) -> Result<Self, Self::Error> {
        let finish: Finish = row.finish.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid finish in database: {e}"))
        })?;
        let material: Material = row.material.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid material in database: {e}"))
        })?;

        Ok(Self {
            id: row.id,
            finish,
            material,
            image_url: row.image_url,
        })
    }
}

#[async_trait]
impl ConfigurationStore for PgConfigurationStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Configuration>, RepositoryError> {
        let row = sqlx::query_as::<_, ConfigurationRow>(
            r"
            SELECT id, finish, material, image_url
            FROM configurations
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Configuration::try_from).transpose()
    }
}
