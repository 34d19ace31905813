//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are Vietnamese đồng. The backend and previously persisted carts
//! carry them as plain JSON integers, so whole amounts serialize as numbers;
//! fractional amounts fall back to a decimal string.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul};

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),

    /// The amount exceeds [`Price::MAX_DONG`].
    #[error("price exceeds {max} đồng (got {0})", max = Price::MAX_DONG)]
    TooLarge(Decimal),
}

/// A non-negative amount in Vietnamese đồng.
///
/// ## Examples
///
/// ```
/// use mtp_food_core::Price;
///
/// let pho = Price::from_dong(50_000);
/// assert_eq!((pho * 2).display(), "100.000đ");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// Zero đồng.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest unit price accepted from the wire or a persisted cart.
    pub const MAX_DONG: u64 = 1_000_000_000_000;

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero, or
    /// [`PriceError::TooLarge`] if it exceeds [`Self::MAX_DONG`].
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        if amount > Decimal::from(Self::MAX_DONG) {
            return Err(PriceError::TooLarge(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of đồng.
    #[must_use]
    pub fn from_dong(dong: u64) -> Self {
        Self(Decimal::from(dong))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Format for display in vi-VN style, rounded to whole đồng (e.g. `130.000đ`).
    #[must_use]
    pub fn display(&self) -> String {
        let whole = self.0.round().to_string();
        let digits = whole.len();
        let mut out = String::with_capacity(digits + digits / 3 + 2);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (digits - i) % 3 == 0 {
                out.push('.');
            }
            out.push(ch);
        }
        out.push('đ');
        out
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

// Sums saturate at the decimal maximum instead of panicking.

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(rhs)))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Self> for Price {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.to_i64() {
            Some(whole) if self.0.fract().is_zero() => serializer.serialize_i64(whole),
            _ => serializer.serialize_str(&self.0.normalize().to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Price::from_dong(0).display(), "0đ");
        assert_eq!(Price::from_dong(999).display(), "999đ");
        assert_eq!(Price::from_dong(30_000).display(), "30.000đ");
        assert_eq!(Price::from_dong(1_250_000).display(), "1.250.000đ");
    }

    #[test]
    fn test_rejects_negative() {
        assert!(matches!(
            Price::new(Decimal::from(-1)),
            Err(PriceError::Negative(_))
        ));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_rejects_amounts_above_max() {
        assert!(Price::new(Decimal::from(Price::MAX_DONG)).is_ok());
        assert!(matches!(
            Price::new(Decimal::from(Price::MAX_DONG + 1)),
            Err(PriceError::TooLarge(_))
        ));
        assert!(matches!(
            Price::new(Decimal::MAX),
            Err(PriceError::TooLarge(_))
        ));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Price::from_dong(u64::MAX);
        let mut total = huge * u32::MAX;
        total += huge * u32::MAX;
        assert_eq!(total.amount(), Decimal::MAX);
        assert_eq!((total + huge).amount(), Decimal::MAX);
        let sum: Price = core::iter::repeat_n(total, 3).sum();
        assert_eq!(sum.amount(), Decimal::MAX);
    }

    #[test]
    fn test_arithmetic() {
        let pho = Price::from_dong(50_000);
        let goi_cuon = Price::from_dong(30_000);
        assert_eq!(pho * 2 + goi_cuon, Price::from_dong(130_000));
        let total: Price = [pho, pho, goi_cuon].iter().sum();
        assert_eq!(total, Price::from_dong(130_000));
        assert_eq!(core::iter::empty::<Price>().sum::<Price>(), Price::ZERO);
    }

    #[test]
    fn test_whole_amounts_serialize_as_numbers() {
        assert_eq!(
            serde_json::to_string(&Price::from_dong(50_000)).unwrap(),
            "50000"
        );
        let fractional = Price::new(Decimal::new(12_345, 1)).unwrap();
        assert_eq!(serde_json::to_string(&fractional).unwrap(), "\"1234.5\"");
    }

    #[test]
    fn test_deserializes_numbers_and_strings() {
        let from_int: Price = serde_json::from_str("50000").unwrap();
        assert_eq!(from_int, Price::from_dong(50_000));
        let from_str: Price = serde_json::from_str("\"1234.5\"").unwrap();
        assert_eq!(from_str.amount(), Decimal::new(12_345, 1));
        assert!(serde_json::from_str::<Price>("-5").is_err());
        assert!(serde_json::from_str::<Price>("\"abc\"").is_err());
        assert!(serde_json::from_str::<Price>("\"79228162514264337593543950335\"").is_err());
    }
}
