//! Consumer access to the active cart.
//!
//! A [`CartProvider`] is created by the application shell and passed by
//! value to every component that needs the cart. Components call
//! [`CartProvider::use_cart`] to reach whichever container is currently
//! mounted. Asking outside a mounted container is a wiring bug and panics.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::config::CartConfig;
use crate::container::{CartContainer, CartHandle};
use crate::error::MissingProviderError;
use crate::storage::CartStorage;

/// Shared slot holding the active cart, if any.
///
/// Cheaply cloneable; every clone sees the same active cart.
#[derive(Debug, Clone, Default)]
pub struct CartProvider {
    active: Arc<RwLock<Option<CartHandle>>>,
}

impl CartProvider {
    /// Create a provider with no active cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a container over `storage` and make it the active cart.
    ///
    /// The returned container must be kept alive for as long as the cart
    /// is in use; see [`CartProvider::unmount`].
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    #[must_use]
    pub fn mount(&self, storage: CartStorage, config: &CartConfig) -> CartContainer {
        let container = CartContainer::mount(storage, config);
        self.provide(container.handle());
        container
    }

    /// Withdraw the active cart and stop `container`.
    pub async fn unmount(&self, container: CartContainer) {
        self.withdraw();
        container.unmount().await;
    }

    /// Make `handle` the active cart, returning the one it replaces.
    pub fn provide(&self, handle: CartHandle) -> Option<CartHandle> {
        debug!("Cart provided");
        self.active.write().replace(handle)
    }

    /// Remove the active cart.
    pub fn withdraw(&self) -> Option<CartHandle> {
        debug!("Cart withdrawn");
        self.active.write().take()
    }

    /// Whether a cart is currently provided.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.read().is_some()
    }

    /// Get the active cart.
    ///
    /// # Errors
    ///
    /// Returns [`MissingProviderError`] if no cart is provided.
    pub fn try_use_cart(&self) -> Result<CartHandle, MissingProviderError> {
        self.active.read().clone().ok_or(MissingProviderError)
    }

    /// Get the active cart.
    ///
    /// # Panics
    ///
    /// Panics with [`MissingProviderError`] if no cart is provided.
    #[must_use]
    pub fn use_cart(&self) -> CartHandle {
        match self.try_use_cart() {
            Ok(handle) => handle,
            Err(e) => panic!("{e}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use go_marketplace_core::{NewCartItem, Price};

    use super::*;
    use crate::storage::MemoryStore;

    fn storage() -> CartStorage {
        CartStorage::new(Arc::new(MemoryStore::new()), "@GoMarketplace")
    }

    #[test]
    fn test_try_use_cart_without_container() {
        let provider = CartProvider::new();
        assert!(!provider.is_active());
        assert_eq!(provider.try_use_cart().unwrap_err(), MissingProviderError);
    }

    #[test]
    #[should_panic(expected = "use_cart must be used within a mounted CartProvider")]
    fn test_use_cart_without_container_panics() {
        let provider = CartProvider::new();
        let _ = provider.use_cart();
    }

    #[tokio::test]
    async fn test_clones_share_active_cart() {
        let provider = CartProvider::new();
        let consumer = provider.clone();
        let container = provider.mount(storage(), &CartConfig::default());

        let cart = consumer.use_cart();
        cart.add_to_cart(NewCartItem::new("a", "T", "u", Price::from_f64(1.0).unwrap()))
            .await
            .unwrap();
        assert_eq!(provider.use_cart().products().len(), 1);

        provider.unmount(container).await;
        assert!(consumer.try_use_cart().is_err());
    }

    #[tokio::test]
    async fn test_provide_replaces_previous() {
        let provider = CartProvider::new();
        let first = CartContainer::mount(storage(), &CartConfig::default());
        let second = CartContainer::mount(storage(), &CartConfig::default());

        assert!(provider.provide(first.handle()).is_none());
        assert!(provider.provide(second.handle()).is_some());
        assert!(provider.withdraw().is_some());
        assert!(provider.withdraw().is_none());

        first.unmount().await;
        second.unmount().await;
    }
}
