use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AddressError {
    #[error("{0} is not valid contract address")]
    Match(String),
    #[error("Address regex error")]
    Regex(#[from] regex::Error),
}

impl Address {
    const MAX_LENGTH: usize = 42;
    const PATTERN: &str = r"^0x[a-fA-F0-9]+$";

    /// # Errors
    ///
    /// Will fail if the `raw` doesn't match address regex, i.e. it
    /// has to start with "0x" followed by at most 40 hexadecimal digits.
    pub fn new(raw: &str) -> Result<Self, AddressError> {
        let re = Regex::new(Self::PATTERN)?;

        if raw.len() <= Self::MAX_LENGTH && re.is_match(raw) {
            Ok(Self(raw.into()))
        } else {
            Err(AddressError::Match(raw.to_string()))
        }
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::new(&raw)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_full_address() {
        let valid = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
        assert!(Address::new(valid).is_ok());
    }

    #[test]
    fn test_valid_short_address() {
        assert!(Address::new("0xabc").is_ok());
    }

    #[test]
    fn test_invalid_address_pattern() {
        assert!(Address::new("0xGHIJKL").is_err());
    }

    #[test]
    fn test_invalid_address_no_prefix() {
        assert!(Address::new("5FbDB2315678afecb367f032d93F642f64180aa3").is_err());
    }

    #[test]
    fn test_invalid_address_too_long() {
        let too_long = "0x5FbDB2315678afecb367f032d93F642f64180aa3ff";
        assert!(Address::new(too_long).is_err());
    }

    #[test]
    fn test_empty_address() {
        assert!(Address::new("").is_err());
    }

    #[test]
    fn test_address_serializes_as_plain_string() {
        let address = Address::new("0xabc").unwrap();
        assert_eq!(serde_json::to_string(&address).unwrap(), "\"0xabc\"");

        let parsed: Address = serde_json::from_str("\"0xabc\"").unwrap();
        assert_eq!(parsed, address);
        assert!(serde_json::from_str::<Address>("\"abc\"").is_err());
    }

    #[test]
    fn test_address_error_display() {
        let error = AddressError::Match("nope".to_string());
        assert_eq!(format!("{error}"), "nope is not valid contract address");
    }
}
