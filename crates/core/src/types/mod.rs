//! Core types for GoMarketplace.
//!
//! This module provides type-safe wrappers for cart domain concepts.

pub mod cart;
pub mod id;
pub mod item;
pub mod price;

pub use cart::{Cart, CartInvariantError};
pub use id::*;
pub use item::{CartItem, NewCartItem};
pub use price::{Price, PriceError};
