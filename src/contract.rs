use std::{fmt, str::FromStr};
use thiserror::Error;

use crate::address::{Address, AddressError};

/// A deployed contract, identified by the name it is declared with in
/// its source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractByName {
    pub name: String,
    pub address: Address,
    pub network: Option<String>,
}

#[derive(Debug, Error)]
pub enum ContractSpecError {
    #[error("[E030] Invalid contract '{0}', expected NAME=ADDRESS or NAME=ADDRESS@NETWORK")]
    Format(String),

    #[error("[E031] Contract name cannot be empty")]
    EmptyName,

    #[error("[E032] Network cannot be empty in '{0}'")]
    EmptyNetwork(String),

    #[error(transparent)]
    Address(#[from] AddressError),
}

impl ContractSpecError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Format(_) => "E030",
            Self::EmptyName => "E031",
            Self::EmptyNetwork(_) => "E032",
            Self::Address(_) => "E033",
        }
    }
}

impl ContractByName {
    pub fn new(name: impl Into<String>, address: Address, network: Option<String>) -> Self {
        Self {
            name: name.into(),
            address,
            network,
        }
    }
}

impl FromStr for ContractByName {
    type Err = ContractSpecError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (name, rest) = raw
            .split_once('=')
            .ok_or_else(|| ContractSpecError::Format(raw.to_string()))?;

        let name = name.trim();
        if name.is_empty() {
            return Err(ContractSpecError::EmptyName);
        }

        let (address, network) = match rest.split_once('@') {
            Some((_, network)) if network.trim().is_empty() => {
                return Err(ContractSpecError::EmptyNetwork(raw.to_string()))
            }
            Some((address, network)) => (address, Some(network.trim().to_string())),
            None => (rest, None),
        };

        Ok(Self::new(name, Address::new(address.trim())?, network))
    }
}

impl fmt::Display for ContractByName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.address)?;
        if let Some(network) = &self.network {
            write!(f, "@{network}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_without_network() {
        let contract: ContractByName = "Token=0xabc".parse().unwrap();
        assert_eq!(contract.name, "Token");
        assert_eq!(contract.address.as_ref(), "0xabc");
        assert_eq!(contract.network, None);
    }

    #[test]
    fn test_parse_with_network() {
        let contract: ContractByName = "Token=0xabc@ropsten".parse().unwrap();
        assert_eq!(contract.network.as_deref(), Some("ropsten"));
        assert_eq!(contract.to_string(), "Token=0xabc@ropsten");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            "Token".parse::<ContractByName>(),
            Err(ContractSpecError::Format(_))
        ));
        assert!(matches!(
            "=0xabc".parse::<ContractByName>(),
            Err(ContractSpecError::EmptyName)
        ));
        assert!(matches!(
            "Token=0xabc@".parse::<ContractByName>(),
            Err(ContractSpecError::EmptyNetwork(_))
        ));
        assert!(matches!(
            "Token=abc".parse::<ContractByName>(),
            Err(ContractSpecError::Address(_))
        ));
    }
}
