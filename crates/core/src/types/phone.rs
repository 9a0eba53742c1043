//! Phone number type, normalized to the Russian `+7XXXXXXXXXX` format.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone cannot be empty")]
    Empty,
    /// The input string is too long to be a phone number.
    #[error("phone must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The digits do not form a valid Russian phone number.
    #[error("phone must be 11 digits starting with 7 or 8 (e.g. +7XXXXXXXXXX)")]
    InvalidFormat,
}

/// A phone number stored in canonical `+7XXXXXXXXXX` form.
///
/// Accepts user input in any punctuation style (`+7 (912) 345-67-89`,
/// `89123456789`, ...). The leading `8` common in domestic dialing is
/// rewritten to `7` before storage; every other non-digit character is
/// stripped.
///
/// ## Examples
///
/// ```
/// use demitasse_core::Phone;
///
/// let phone = Phone::parse("8 (912) 345-67-89").unwrap();
/// assert_eq!(phone.as_str(), "+79123456789");
///
/// assert!(Phone::parse("12345").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Maximum length of raw phone input.
    pub const MAX_INPUT_LENGTH: usize = 20;

    /// Parse a `Phone` from user input, normalizing to `+7XXXXXXXXXX`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, longer than 20 characters,
    /// or does not reduce to 11 digits starting with `7` or `8`.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        if s.len() > Self::MAX_INPUT_LENGTH {
            return Err(PhoneError::TooLong {
                max: Self::MAX_INPUT_LENGTH,
            });
        }

        let digits: String = s.chars().filter(char::is_ascii_digit).collect();

        if digits.len() != 11 {
            return Err(PhoneError::InvalidFormat);
        }

        let rest = digits.get(1..).unwrap_or_default();
        match digits.chars().next() {
            Some('7' | '8') => Ok(Self(format!("+7{rest}"))),
            _ => Err(PhoneError::InvalidFormat),
        }
    }

    /// Returns the canonical phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plus_seven() {
        let phone = Phone::parse("+79123456789").unwrap();
        assert_eq!(phone.as_str(), "+79123456789");
    }

    #[test]
    fn test_parse_domestic_eight() {
        let phone = Phone::parse("89123456789").unwrap();
        assert_eq!(phone.as_str(), "+79123456789");
    }

    #[test]
    fn test_parse_with_punctuation() {
        let phone = Phone::parse("8 (912) 345-67-89").unwrap();
        assert_eq!(phone.as_str(), "+79123456789");
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(Phone::parse(""), Err(PhoneError::Empty));
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert_eq!(Phone::parse("12345"), Err(PhoneError::InvalidFormat));
        assert_eq!(Phone::parse("791234567890"), Err(PhoneError::InvalidFormat));
    }

    #[test]
    fn test_rejects_wrong_country_prefix() {
        assert_eq!(Phone::parse("19123456789"), Err(PhoneError::InvalidFormat));
    }

    #[test]
    fn test_rejects_too_long_input() {
        let long = "+7".repeat(20);
        assert!(matches!(
            Phone::parse(&long),
            Err(PhoneError::TooLong { max: 20 })
        ));
    }
}
