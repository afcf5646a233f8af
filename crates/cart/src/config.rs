//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_STORAGE_KEY` - Key the cart blob is stored under (default: `@GoMarketplace`)
//! - `CART_STORAGE_DIR` - Directory for the file-backed store (default: `.gomarketplace`)
//! - `CART_QUEUE_CAPACITY` - Pending mutations allowed before callers wait (default: 32)

use std::path::PathBuf;

use thiserror::Error;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "@GoMarketplace";

const DEFAULT_STORAGE_DIR: &str = ".gomarketplace";
const DEFAULT_QUEUE_CAPACITY: usize = 32;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Key the serialized cart is stored under
    pub storage_key: String,
    /// Root directory for [`FileStore`](crate::FileStore)
    pub storage_dir: PathBuf,
    /// Capacity of the container's mutation queue
    pub queue_capacity: usize,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let storage_key =
            lookup("CART_STORAGE_KEY").unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());
        if storage_key.is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        let storage_dir = lookup("CART_STORAGE_DIR")
            .map_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR), PathBuf::from);

        let queue_capacity = match lookup("CART_QUEUE_CAPACITY") {
            Some(raw) => parse_capacity(&raw)?,
            None => DEFAULT_QUEUE_CAPACITY,
        };

        Ok(Self {
            storage_key,
            storage_dir,
            queue_capacity,
        })
    }
}

fn parse_capacity(raw: &str) -> Result<usize, ConfigError> {
    let invalid =
        |reason: String| ConfigError::InvalidEnvVar("CART_QUEUE_CAPACITY".to_string(), reason);

    let capacity = raw.parse::<usize>().map_err(|e| invalid(e.to_string()))?;
    if capacity == 0 {
        return Err(invalid("must be greater than zero".to_string()));
    }
    Ok(capacity)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = CartConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, CartConfig::default());
        assert_eq!(config.storage_key, "@GoMarketplace");
    }

    #[test]
    fn test_overrides() {
        let config = CartConfig::from_lookup(lookup(&[
            ("CART_STORAGE_KEY", "@Tests"),
            ("CART_STORAGE_DIR", "/tmp/carts"),
            ("CART_QUEUE_CAPACITY", "4"),
        ]))
        .unwrap();

        assert_eq!(config.storage_key, "@Tests");
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/carts"));
        assert_eq!(config.queue_capacity, 4);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let err = CartConfig::from_lookup(lookup(&[("CART_QUEUE_CAPACITY", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(name, _) if name == "CART_QUEUE_CAPACITY"));
    }

    #[test]
    fn test_non_numeric_capacity_rejected() {
        assert!(CartConfig::from_lookup(lookup(&[("CART_QUEUE_CAPACITY", "lots")])).is_err());
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(CartConfig::from_lookup(lookup(&[("CART_STORAGE_KEY", "")])).is_err());
    }
}
