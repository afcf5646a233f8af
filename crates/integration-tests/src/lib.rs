//! Integration tests for GoMarketplace.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p go-marketplace-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_lifecycle` - Mutation scenarios through a mounted container
//! - `cart_persistence` - Round trips through memory and file stores
//! - `cart_provider` - Consumer access through `CartProvider`
//!
//! This library holds the fixtures those tests share.

use std::sync::Arc;

use go_marketplace_cart::{CartConfig, CartContainer, CartStorage, KeyValueStore, MemoryStore};
use go_marketplace_core::{CartItem, NewCartItem, Price};

/// Storage key used by every fixture.
pub const TEST_KEY: &str = "@GoMarketplace";

/// A product with a fixed title, image, and price.
#[must_use]
pub fn product(id: &str) -> NewCartItem {
    NewCartItem::new(
        id,
        format!("Product {id}"),
        format!("https://images.example/{id}.png"),
        Price::from(10_u32),
    )
}

/// Mount a container over `store` under [`TEST_KEY`].
#[must_use]
pub fn mount(store: Arc<dyn KeyValueStore>) -> CartContainer {
    CartContainer::mount(CartStorage::new(store, TEST_KEY), &CartConfig::default())
}

/// Mount a container over a fresh [`MemoryStore`], returning both.
#[must_use]
pub fn mount_in_memory() -> (Arc<MemoryStore>, CartContainer) {
    let store = Arc::new(MemoryStore::new());
    let container = mount(store.clone());
    (store, container)
}

/// `(id, quantity)` pairs, in cart order.
#[must_use]
pub fn quantities(items: &[CartItem]) -> Vec<(String, u32)> {
    items
        .iter()
        .map(|item| (item.id.to_string(), item.quantity))
        .collect()
}

/// Build the expected output of [`quantities`] from string slices.
#[must_use]
pub fn lines(expected: &[(&str, u32)]) -> Vec<(String, u32)> {
    expected
        .iter()
        .map(|(id, quantity)| ((*id).to_string(), *quantity))
        .collect()
}
