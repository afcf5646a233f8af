//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored in the cart blob as plain JSON numbers (e.g. `19.9`),
//! but all arithmetic happens on [`Decimal`] so subtotals never pick up
//! floating-point drift.
//!
//! Conversion from `f64` goes through the shortest decimal string that
//! parses back to the same `f64`, so a stored number is read and written
//! back unchanged (`0.30000000000000004` stays `0.30000000000000004`).

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when constructing a [`Price`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
    /// The amount is NaN or infinite.
    #[error("price must be a finite number")]
    NotFinite,
    /// The amount is finite but too large for a decimal price.
    #[error("price {0} is out of range")]
    OutOfRange(f64),
}

/// A non-negative unit price in the store's currency.
///
/// ```
/// use go_marketplace_core::Price;
///
/// let price = Price::from_f64(19.9).unwrap();
/// assert_eq!(price.times(2).to_string(), "39.8");
/// assert!(Price::from_f64(-1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a floating-point amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotFinite`] for NaN or infinite input,
    /// [`PriceError::OutOfRange`] for magnitudes beyond [`Decimal::MAX`], and
    /// [`PriceError::Negative`] for amounts below zero.
    pub fn from_f64(amount: f64) -> Result<Self, PriceError> {
        if !amount.is_finite() {
            return Err(PriceError::NotFinite);
        }
        // `f64` display is the shortest string that round-trips.
        let decimal =
            Decimal::from_str(&amount.to_string()).map_err(|_| PriceError::OutOfRange(amount))?;
        Self::new(decimal)
    }

    /// Get the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Decimal {
        self.0.saturating_mul(Decimal::from(quantity))
    }
}

impl From<u32> for Price {
    fn from(amount: u32) -> Self {
        Self(Decimal::from(amount))
    }
}

impl TryFrom<f64> for Price {
    type Error = PriceError;

    fn try_from(amount: f64) -> Result<Self, Self::Error> {
        Self::from_f64(amount)
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> Self {
        // Decimal display is exact, and float parsing rounds correctly.
        price.0.to_string().parse().unwrap_or_default()
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.pad(&format!("{:.2}", self.0))
    }
}
