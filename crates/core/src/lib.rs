//! GoMarketplace Core - Shared cart types.
//!
//! This crate provides the types used across all GoMarketplace components:
//! - `cart` - Cart container, persistence adapter, and provider
//! - `cli` - Command-line tool for inspecting and editing a stored cart
//!
//! # Architecture
//!
//! The core crate contains only types and the cart mutation rules - no I/O,
//! no storage access, no async runtime. This keeps it lightweight and allows
//! it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, prices, cart items, and the ordered [`Cart`] list

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
