//! Vietnamese mobile phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The number does not start with `0`.
    #[error("phone number must start with 0")]
    MissingLeadingZero,
    /// The number contains something other than ASCII digits.
    #[error("phone number may only contain digits")]
    NonDigit,
    /// The number is not exactly ten digits long.
    #[error("phone number must have exactly {expected} digits (got {actual})")]
    WrongLength {
        /// Required digit count.
        expected: usize,
        /// Digit count of the input.
        actual: usize,
    },
}

/// A ten-digit domestic phone number starting with `0` (e.g. `0901234567`).
///
/// ```
/// use mtp_food_core::PhoneNumber;
///
/// assert!(PhoneNumber::parse("0901234567").is_ok());
/// assert!(PhoneNumber::parse("901234567").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Number of digits in a valid phone number.
    pub const DIGITS: usize = 10;

    /// Parse a phone number.
    ///
    /// # Errors
    ///
    /// Returns an error unless the input is `0` followed by exactly nine digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(PhoneError::NonDigit);
        }
        if !s.starts_with('0') {
            return Err(PhoneError::MissingLeadingZero);
        }
        if s.len() != Self::DIGITS {
            return Err(PhoneError::WrongLength {
                expected: Self::DIGITS,
                actual: s.len(),
            });
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(PhoneNumber::parse("0901234567").is_ok());
        assert!(PhoneNumber::parse("0000000000").is_ok());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            PhoneNumber::parse("9012345678"),
            Err(PhoneError::MissingLeadingZero)
        );
        assert_eq!(PhoneNumber::parse("090-123-456"), Err(PhoneError::NonDigit));
        assert_eq!(
            PhoneNumber::parse("090123456"),
            Err(PhoneError::WrongLength {
                expected: 10,
                actual: 9
            })
        );
        assert!(matches!(
            PhoneNumber::parse("09012345678"),
            Err(PhoneError::WrongLength { .. })
        ));
        assert!(matches!(
            PhoneNumber::parse(""),
            Err(PhoneError::MissingLeadingZero)
        ));
    }
}
