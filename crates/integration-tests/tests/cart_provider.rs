//! Integration tests for consumer access through `CartProvider`.

use std::sync::Arc;

use go_marketplace_cart::{
    CartConfig, CartProvider, CartStorage, MemoryStore, MissingProviderError,
};
use go_marketplace_core::ProductId;
use go_marketplace_integration_tests::{TEST_KEY, lines, product, quantities};

/// A consumer that only knows about the provider it was given.
struct CartBadge {
    provider: CartProvider,
}

impl CartBadge {
    fn count(&self) -> u64 {
        self.provider.use_cart().cart().total_quantity()
    }
}

#[test]
fn test_unmounted_provider_reports_missing() {
    let provider = CartProvider::new();
    assert_eq!(provider.try_use_cart().unwrap_err(), MissingProviderError);
}

#[test]
#[should_panic(expected = "use_cart must be used within a mounted CartProvider")]
fn test_consumer_outside_provider_panics() {
    let badge = CartBadge {
        provider: CartProvider::new(),
    };
    let _ = badge.count();
}

#[tokio::test]
async fn test_consumers_share_the_mounted_cart() {
    let provider = CartProvider::new();
    let storage = CartStorage::new(Arc::new(MemoryStore::new()), TEST_KEY);
    let container = provider.mount(storage, &CartConfig::default());

    let badge = CartBadge {
        provider: provider.clone(),
    };
    let page = provider.clone();

    let cart = page.use_cart();
    cart.initialized().await.unwrap();
    cart.add_to_cart(product("a")).await.unwrap();
    cart.add_to_cart(product("a")).await.unwrap();
    cart.add_to_cart(product("b")).await.unwrap();

    assert_eq!(badge.count(), 3);
    assert_eq!(
        quantities(&badge.provider.use_cart().products()),
        lines(&[("a", 2), ("b", 1)])
    );

    provider.unmount(container).await;
    assert!(!page.is_active());
}

#[tokio::test]
async fn test_subscriber_follows_changes() {
    let provider = CartProvider::new();
    let storage = CartStorage::new(Arc::new(MemoryStore::new()), TEST_KEY);
    let container = provider.mount(storage, &CartConfig::default());

    let cart = provider.use_cart();
    cart.initialized().await.unwrap();
    let mut changes = cart.subscribe();
    changes.borrow_and_update();

    cart.add_to_cart(product("a")).await.unwrap();
    changes.changed().await.unwrap();
    assert_eq!(changes.borrow_and_update().cart.len(), 1);

    cart.decrement(&ProductId::new("a")).await.unwrap();
    changes.changed().await.unwrap();
    assert!(changes.borrow_and_update().cart.is_empty());

    provider.unmount(container).await;
}
