//! Thread-safe in-memory store implementations.
//!
//! Used by tests and local development where persistence is not required.
//! Each store holds an `Arc<RwLock<HashMap>>`, so clones share state.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ConfigurationStore, OrderStore, RepositoryError, UserStore};
use crate::models::{Configuration, Order, User};

/// In-memory configuration store.
#[derive(Default, Clone)]
pub struct MemoryConfigurationStore {
    configurations: Arc<RwLock<HashMap<String, Configuration>>>,
}

impl MemoryConfigurationStore {
    /// Create a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a configuration.
    pub async fn insert(&self, configuration: Configuration) {
        let mut configurations = self.configurations.write().await;
        configurations.insert(configuration.id.clone(), configuration);
    }
}

#[async_trait]
impl ConfigurationStore for MemoryConfigurationStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Configuration>, RepositoryError> {
        let configurations = self.configurations.read().await;
        Ok(configurations.get(id).cloned())
    }
}

/// In-memory user store.
#[derive(Default, Clone)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl MemoryUserStore {
    /// Create a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn upsert(&self, id: &str, email: &str) -> Result<(), RepositoryError> {
        let mut users = self.users.write().await;
        users.entry(id.to_owned()).or_insert_with(|| User {
            id: id.to_owned(),
            email: email.to_owned(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }
}

/// In-memory order store.
#[derive(Default, Clone)]
pub struct MemoryOrderStore {
    orders: Arc<RwLock<HashMap<(String, String), Order>>>,
}

impl MemoryOrderStore {
    /// Create a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of orders in the store.
    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Whether the store holds no orders.
    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn find_one(
        &self,
        user_id: &str,
        configuration_id: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let orders = self.orders.read().await;
        Ok(orders
            .get(&(user_id.to_owned(), configuration_id.to_owned()))
            .cloned())
    }

    async fn insert(
        &self,
        user_id: &str,
        configuration_id: &str,
        amount: Decimal,
    ) -> Result<Order, RepositoryError> {
        // Check-and-insert under one write lock, mirroring the database's
        // unique-constraint guarantee.
        let mut orders = self.orders.write().await;
        let order = orders
            .entry((user_id.to_owned(), configuration_id.to_owned()))
            .or_insert_with(|| Order {
                id: Uuid::new_v4(),
                user_id: user_id.to_owned(),
                configuration_id: configuration_id.to_owned(),
                amount,
                created_at: Utc::now(),
            });
        Ok(order.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use caseforge_core::{Finish, Material};

    #[tokio::test]
    async fn test_configuration_store_lookup() {
        let store = MemoryConfigurationStore::new();
        store
            .insert(Configuration {
                id: "cfg-1".to_owned(),
                finish: Finish::Textured,
                material: Material::Silicone,
                image_url: "https://img.test/cfg-1.png".to_owned(),
            })
            .await;

        let found = store.find_by_id("cfg-1").await.unwrap().unwrap();
        assert_eq!(found.finish, Finish::Textured);
        assert!(store.find_by_id("cfg-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_upsert_does_not_overwrite() {
        let store = MemoryUserStore::new();
        store.upsert("user-1", "first@example.com").await.unwrap();
        store.upsert("user-1", "changed@example.com").await.unwrap();

        let user = store.find_by_id("user-1").await.unwrap().unwrap();
        assert_eq!(user.email, "first@example.com");
    }

    #[tokio::test]
    async fn test_order_get_or_create_is_idempotent() {
        let store = MemoryOrderStore::new();

        let first = store
            .get_or_create("user-1", "cfg-1", Decimal::new(1400, 2))
            .await
            .unwrap();
        let second = store
            .get_or_create("user-1", "cfg-1", Decimal::new(9999, 2))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        // The existing order keeps its original amount.
        assert_eq!(second.amount, Decimal::new(1400, 2));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_order_pairs_are_independent() {
        let store = MemoryOrderStore::new();
        let amount = Decimal::new(1400, 2);

        let a = store.get_or_create("user-1", "cfg-1", amount).await.unwrap();
        let b = store.get_or_create("user-1", "cfg-2", amount).await.unwrap();
        let c = store.get_or_create("user-2", "cfg-1", amount).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_ne!(a.id, c.id);
        assert_eq!(store.len().await, 3);
    }
}
