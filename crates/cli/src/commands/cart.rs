//! Cart commands.
//!
//! Each invocation mounts a container over the file-backed store, waits for
//! hydration, runs one operation, and unmounts again.

use std::fmt::Write as _;
use std::sync::Arc;

use go_marketplace_cart::{CartConfig, CartContainer, CartError, CartHandle, CartStorage, FileStore};
use go_marketplace_core::{Cart, NewCartItem, Price, PriceError, ProductId};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while running a cart command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Cart operation failed.
    #[error("{0}")]
    Cart(#[from] CartError),

    /// The price argument is not a valid price.
    #[error("Invalid price: {0}")]
    Price(#[from] PriceError),
}

/// A mounted cart for the duration of one command.
pub struct Session {
    container: CartContainer,
    cart: CartHandle,
}

impl Session {
    /// Mount the cart stored under `config` and wait for it to load.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored cart cannot be read. The container is
    /// unmounted first so a corrupt cart is never overwritten.
    pub async fn open(config: &CartConfig) -> Result<Self, CommandError> {
        let store = FileStore::new(config.storage_dir.clone());
        info!(path = %store.path_for(&config.storage_key).display(), "Opening cart");

        let storage = CartStorage::new(Arc::new(store), &config.storage_key);
        let container = CartContainer::mount(storage, config);
        let cart = container.handle();

        if let Err(e) = cart.initialized().await {
            container.unmount().await;
            return Err(e.into());
        }

        Ok(Self { container, cart })
    }

    /// The mounted cart.
    #[must_use]
    pub const fn cart(&self) -> &CartHandle {
        &self.cart
    }

    /// Unmount the cart, finishing any queued writes.
    pub async fn close(self) {
        self.container.unmount().await;
    }
}

/// Print the cart.
#[allow(clippy::print_stdout)]
pub fn show(cart: &CartHandle) {
    print!("{}", render(&cart.cart()));
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns an error if the price is invalid or the cart cannot be saved.
pub async fn add(
    cart: &CartHandle,
    id: String,
    title: String,
    image_url: String,
    price: f64,
) -> Result<(), CommandError> {
    let product = NewCartItem::new(id, title, image_url, Price::from_f64(price)?);
    let items = cart.add_to_cart(product).await?;
    info!(items = items.len(), "Added to cart");
    show(cart);
    Ok(())
}

/// Add one unit to an existing product.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub async fn increment(cart: &CartHandle, id: &str) -> Result<(), CommandError> {
    cart.increment(&ProductId::new(id)).await?;
    show(cart);
    Ok(())
}

/// Remove one unit of an existing product.
///
/// # Errors
///
/// Returns an error if the cart cannot be saved.
pub async fn decrement(cart: &CartHandle, id: &str) -> Result<(), CommandError> {
    cart.decrement(&ProductId::new(id)).await?;
    show(cart);
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the stored cart cannot be removed.
pub async fn clear(cart: &CartHandle) -> Result<(), CommandError> {
    cart.clear().await?;
    info!("Cart cleared");
    Ok(())
}

/// Format the cart as a plain-text table.
fn render(cart: &Cart) -> String {
    if cart.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = String::new();
    for item in cart.items() {
        let _ = writeln!(
            out,
            "{:<12} {:<32} {:>4} x {:>10} = {:>10.2}",
            item.id.as_str(),
            item.title,
            item.quantity,
            item.price,
            item.line_total()
        );
    }
    let _ = writeln!(
        out,
        "{} item(s), subtotal {:.2}",
        cart.total_quantity(),
        cart.subtotal()
    );
    out
}
