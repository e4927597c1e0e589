//! Strictly positive line quantity.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    /// The value is zero or negative.
    #[error("quantity must be strictly positive (got {0})")]
    NotPositive(i64),
}

/// A cart or order line quantity.
///
/// Guaranteed strictly positive by construction; a quantity edit to
/// zero or below is rejected rather than clamped.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct Quantity(u32);

impl Quantity {
    /// A quantity of one, the default for a first scan.
    pub const ONE: Self = Self(1);

    /// Construct a `Quantity` from a signed value.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::NotPositive`] when `value <= 0` or the
    /// value does not fit in a `u32`.
    pub fn new(value: i64) -> Result<Self, QuantityError> {
        let qty = u32::try_from(value).map_err(|_| QuantityError::NotPositive(value))?;
        if qty == 0 {
            return Err(QuantityError::NotPositive(value));
        }
        Ok(Self(qty))
    }

    /// Returns the quantity as a `u32`.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Sum of two quantities, saturating at `u32::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for i64 {
    fn from(qty: Quantity) -> Self {
        Self::from(qty.0)
    }
}
