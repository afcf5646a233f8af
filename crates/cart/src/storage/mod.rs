//! Persistent storage for the cart.
//!
//! # Architecture
//!
//! - [`KeyValueStore`] is the device storage seam: string keys, string values
//! - [`MemoryStore`] keeps values in process (tests, embedders without a disk)
//! - [`FileStore`] keeps one file per key under a root directory
//! - [`CartStorage`] binds a store to a single key and speaks [`Cart`]
//!
//! The whole cart is stored as one JSON array under one key. Every save
//! overwrites the previous value; there are no partial writes and no
//! versioning.

mod file;
mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use go_marketplace_core::Cart;
use tracing::{debug, instrument};

use crate::error::{CartError, StorageError};

pub use file::FileStore;
pub use memory::MemoryStore;

/// An async string key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Remove `key`.
    ///
    /// Returns `Ok(())` even if the key did not exist.
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Reads and writes the serialized cart under one storage key.
#[derive(Clone)]
pub struct CartStorage {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl std::fmt::Debug for CartStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStorage")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl CartStorage {
    /// Bind `store` to `key`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The storage key the cart lives under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the persisted cart.
    ///
    /// Returns `Ok(None)` if nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the read fails and
    /// [`CartError::Deserialization`] if the stored value is not a valid cart.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn load(&self) -> Result<Option<Cart>, CartError> {
        let Some(raw) = self.store.get_item(&self.key).await? else {
            debug!("No persisted cart");
            return Ok(None);
        };

        let cart: Cart = serde_json::from_str(&raw).map_err(CartError::Deserialization)?;
        debug!(items = cart.len(), "Loaded persisted cart");
        Ok(Some(cart))
    }

    /// Persist the full cart, overwriting the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Serialization`] if encoding fails and
    /// [`CartError::Storage`] if the write fails.
    #[instrument(skip(self, cart), fields(key = %self.key, items = cart.len()))]
    pub async fn save(&self, cart: &Cart) -> Result<(), CartError> {
        let raw = serde_json::to_string(cart).map_err(CartError::Serialization)?;
        self.store.set_item(&self.key, raw).await?;
        Ok(())
    }

    /// Remove the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the removal fails.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn clear(&self) -> Result<(), CartError> {
        self.store.remove_item(&self.key).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use go_marketplace_core::{NewCartItem, Price};

    use super::*;

    fn storage() -> (Arc<MemoryStore>, CartStorage) {
        let store = Arc::new(MemoryStore::new());
        let storage = CartStorage::new(store.clone(), "@GoMarketplace");
        (store, storage)
    }

    #[tokio::test]
    async fn test_load_absent_returns_none() {
        let (_, storage) = storage();
        assert!(storage.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_writes_json_array() {
        let (store, storage) = storage();
        let mut cart = Cart::new();
        cart.add(NewCartItem::new("a", "T", "u", Price::from_f64(10.0).unwrap()));

        storage.save(&cart).await.unwrap();

        let raw = store.get_item("@GoMarketplace").await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"id": "a", "title": "T", "image_url": "u", "price": 10.0, "quantity": 1}
            ])
        );
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let (_, storage) = storage();
        let mut cart = Cart::new();
        cart.add(NewCartItem::new("a", "T", "u", Price::from_f64(9.99).unwrap()));
        cart.add(NewCartItem::new("b", "U", "v", Price::from_f64(1.5).unwrap()));
        cart.add(NewCartItem::new("a", "T", "u", Price::from_f64(9.99).unwrap()));

        storage.save(&cart).await.unwrap();
        assert_eq!(storage.load().await.unwrap(), Some(cart));
    }

    #[tokio::test]
    async fn test_load_invalid_json() {
        let (store, storage) = storage();
        store
            .set_item("@GoMarketplace", "not json".to_string())
            .await
            .unwrap();

        assert!(matches!(
            storage.load().await,
            Err(CartError::Deserialization(_))
        ));
    }

    #[tokio::test]
    async fn test_load_rejects_duplicate_ids() {
        let (store, storage) = storage();
        let raw = r#"[
            {"id":"a","title":"T","image_url":"u","price":1,"quantity":1},
            {"id":"a","title":"T","image_url":"u","price":1,"quantity":2}
        ]"#;
        store
            .set_item("@GoMarketplace", raw.to_string())
            .await
            .unwrap();

        assert!(matches!(
            storage.load().await,
            Err(CartError::Deserialization(_))
        ));
    }

    #[tokio::test]
    async fn test_clear_removes_key() {
        let (store, storage) = storage();
        storage.save(&Cart::new()).await.unwrap();
        storage.clear().await.unwrap();

        assert!(store.get_item("@GoMarketplace").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = Arc::new(MemoryStore::new());
        let first = CartStorage::new(store.clone(), "@First");
        let second = CartStorage::new(store, "@Second");

        let mut cart = Cart::new();
        cart.add(NewCartItem::new("a", "T", "u", Price::ZERO));
        first.save(&cart).await.unwrap();

        assert!(second.load().await.unwrap().is_none());
    }
}
