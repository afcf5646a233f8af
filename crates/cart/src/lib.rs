//! GoMarketplace cart library.
//!
//! Holds the shopping cart in memory, persists it to a key-value store, and
//! hands consumers a [`CartHandle`] through an explicit [`CartProvider`].
//!
//! # Modules
//!
//! - [`storage`] - Key-value stores and the cart blob adapter
//! - [`container`] - Single-writer cart container with change notifications
//! - [`provider`] - Scope that gives consumers access to the active container
//! - [`config`] - Environment-based configuration
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use go_marketplace_cart::{CartConfig, CartProvider, CartStorage, MemoryStore};
//! use go_marketplace_core::{NewCartItem, Price};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CartConfig::default();
//! let storage = CartStorage::new(Arc::new(MemoryStore::new()), &config.storage_key);
//!
//! let provider = CartProvider::new();
//! let container = provider.mount(storage, &config);
//!
//! let cart = provider.use_cart();
//! cart.initialized().await?;
//! cart.add_to_cart(NewCartItem::new("1", "Shirt", "https://img/1.png", Price::from_f64(20.0)?))
//!     .await?;
//!
//! provider.withdraw();
//! container.unmount().await;
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod container;
pub mod error;
pub mod provider;
pub mod storage;

pub use config::{CartConfig, ConfigError};
pub use container::{CartContainer, CartHandle, CartState, LoadStatus};
pub use error::{CartError, MissingProviderError, Result, StorageError};
pub use provider::CartProvider;
pub use storage::{CartStorage, FileStore, KeyValueStore, MemoryStore};
