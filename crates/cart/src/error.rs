//! Error types for the cart library.
//!
//! [`StorageError`] covers the key-value backends, [`CartError`] is what every
//! cart operation returns, and [`MissingProviderError`] signals a consumer
//! asking for a cart outside of a mounted provider.

use thiserror::Error;

/// A key-value store operation failed.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem read or write failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing store refused or could not serve the request.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Cart operation error.
#[derive(Debug, Error)]
pub enum CartError {
    /// Reading or writing the persisted cart failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The persisted blob is not a valid cart.
    #[error("Invalid stored cart: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// The cart could not be encoded for storage.
    #[error("Failed to encode cart: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Loading the persisted cart at startup failed.
    #[error("Cart hydration failed: {0}")]
    Hydration(String),

    /// The container has been unmounted.
    #[error("Cart container is not running")]
    Unmounted,
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

/// A consumer asked for the cart while no container was provided.
///
/// This is a programming error: the consumer was wired up outside of the
/// provider's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("use_cart must be used within a mounted CartProvider")]
pub struct MissingProviderError;
