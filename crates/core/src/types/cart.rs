//! The ordered cart list and its mutation rules.
//!
//! [`Cart`] keeps two invariants at all times:
//!
//! - every product ID appears at most once
//! - every item has a quantity of at least 1 (an item that would reach 0 is removed)
//!
//! New products are appended; quantity changes happen in place, so the
//! order in which products were first added is preserved.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{CartItem, NewCartItem, ProductId};

/// A stored item list that violates the cart invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartInvariantError {
    /// The same product appears on more than one line.
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),
    /// A line has a quantity of zero.
    #[error("product {0} has a quantity of zero")]
    ZeroQuantity(ProductId),
}

/// An ordered list of cart items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from a stored item list.
    ///
    /// # Errors
    ///
    /// Returns [`CartInvariantError`] if an ID repeats or a quantity is zero.
    pub fn from_items(items: Vec<CartItem>) -> Result<Self, CartInvariantError> {
        for (index, item) in items.iter().enumerate() {
            if item.quantity == 0 {
                return Err(CartInvariantError::ZeroQuantity(item.id.clone()));
            }
            if items.iter().take(index).any(|prev| prev.id == item.id) {
                return Err(CartInvariantError::DuplicateId(item.id.clone()));
            }
        }
        Ok(Self { items })
    }

    /// The items, in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Consume the cart and return its items.
    #[must_use]
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    /// Look up an item by product ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items
            .iter()
            .map(CartItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Add one unit of a product.
    ///
    /// Appends the product with quantity 1 if it is not in the cart yet,
    /// otherwise increments the existing line. Calling this twice for the
    /// same product adds two units.
    ///
    /// Returns `false` without changing anything if the existing line is
    /// already at `u32::MAX`.
    pub fn add(&mut self, product: NewCartItem) -> bool {
        if self.get(&product.id).is_some() {
            return self.increment(&product.id);
        }
        self.items.push(product.into_item());
        true
    }

    /// Add one unit to an existing line.
    ///
    /// Returns `false` without changing anything if the product is not in
    /// the cart or its quantity is already `u32::MAX`.
    pub fn increment(&mut self, id: &ProductId) -> bool {
        let Some(item) = self.get_mut(id) else {
            return false;
        };
        match item.quantity.checked_add(1) {
            Some(quantity) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove one unit from an existing line.
    ///
    /// A line at quantity 1 is removed entirely. Returns `false` without
    /// changing anything if the product is not in the cart.
    pub fn decrement(&mut self, id: &ProductId) -> bool {
        let Some(index) = self.items.iter().position(|item| &item.id == id) else {
            return false;
        };
        let last_unit = self.items.get(index).is_some_and(|item| item.quantity <= 1);
        if last_unit {
            self.items.remove(index);
        } else if let Some(item) = self.items.get_mut(index) {
            item.quantity -= 1;
        }
        true
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn get_mut(&mut self, id: &ProductId) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }
}

impl TryFrom<Vec<CartItem>> for Cart {
    type Error = CartInvariantError;

    fn try_from(items: Vec<CartItem>) -> Result<Self, Self::Error> {
        Self::from_items(items)
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}
