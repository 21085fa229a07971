use lazy_static::lazy_static;
use std::collections::HashMap;

use crate::contract::ContractByName;

/// Network name of the local development chain. Selecting it on the command
/// line defers to the network each contract declares.
pub const LOCAL_NETWORK: &str = "local";

lazy_static! {
    static ref NETWORK_IDS: HashMap<&'static str, &'static str> = HashMap::from([
        ("mainnet", "1"),
        ("ropsten", "3"),
        ("rinkeby", "4"),
        ("goerli", "5"),
        ("kovan", "42"),
        ("sepolia", "11155111"),
        ("holesky", "17000"),
        ("xdai", "100"),
        ("xdai-pos", "77"),
        ("poa", "99"),
        ("poa-core", "99"),
        ("bsc", "56"),
        ("bsc-testnet", "97"),
        ("matic-mainnet", "137"),
        ("matic-mumbai", "80001"),
        ("rsk", "30"),
        ("rsk-testnet", "31"),
        ("fantom", "250"),
        ("fantom-testnet", "4002"),
        ("avalanche", "43114"),
        ("avalanche-fuji", "43113"),
        ("arbitrum", "42161"),
        ("arbitrum-rinkeby", "421611"),
        ("optimism", "10"),
        ("optimism-kovan", "69"),
        ("moonbeam", "1284"),
        ("moonriver", "1285"),
        ("moonbase-alpha", "1287"),
    ]);
}

/// Tenderly network id for a network name, `None` when Tenderly doesn't
/// support it.
pub fn network_id(name: &str) -> Option<&'static str> {
    NETWORK_IDS.get(name.to_lowercase().as_str()).copied()
}

pub fn supported_networks() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = NETWORK_IDS.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Picks the network a contract is pushed to.
///
/// A network given on the command line wins over the one declared with the
/// contract, except when it is [`LOCAL_NETWORK`].
pub fn target_network(cli_network: Option<&str>, contract: &ContractByName) -> Option<String> {
    match cli_network {
        None => contract.network.clone(),
        Some(network) if network.eq_ignore_ascii_case(LOCAL_NETWORK) => contract.network.clone(),
        Some(network) => Some(network.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;

    fn contract(network: Option<&str>) -> ContractByName {
        ContractByName::new(
            "Token",
            Address::new("0xabc").unwrap(),
            network.map(ToString::to_string),
        )
    }

    #[test]
    fn test_known_networks() {
        assert_eq!(network_id("mainnet"), Some("1"));
        assert_eq!(network_id("ropsten"), Some("3"));
        assert_eq!(network_id("matic-mumbai"), Some("80001"));
    }

    #[test]
    fn test_lookup_is_case_insensitive_and_pure() {
        assert_eq!(network_id("Ropsten"), network_id("ropsten"));
        assert_eq!(network_id("ropsten"), network_id("ropsten"));
    }

    #[test]
    fn test_unknown_network_has_no_id() {
        assert_eq!(network_id("hardhat"), None);
        assert_eq!(network_id(LOCAL_NETWORK), None);
        assert_eq!(network_id(""), None);
    }

    #[test]
    fn test_supported_networks_are_sorted() {
        let names = supported_networks();
        assert!(names.windows(2).all(|w| w[0] <= w[1]));
        assert!(names.contains(&"mainnet"));
    }

    #[test]
    fn test_cli_network_overrides_contract() {
        assert_eq!(
            target_network(Some("kovan"), &contract(Some("ropsten"))),
            Some("kovan".to_string())
        );
        assert_eq!(
            target_network(Some("kovan"), &contract(None)),
            Some("kovan".to_string())
        );
    }

    #[test]
    fn test_local_network_defers_to_contract() {
        assert_eq!(
            target_network(Some(LOCAL_NETWORK), &contract(Some("ropsten"))),
            Some("ropsten".to_string())
        );
        assert_eq!(target_network(Some(LOCAL_NETWORK), &contract(None)), None);
    }

    #[test]
    fn test_local_network_ignores_case() {
        assert_eq!(
            target_network(Some("Local"), &contract(Some("ropsten"))),
            Some("ropsten".to_string())
        );
        assert_eq!(target_network(Some("LOCAL"), &contract(None)), None);
    }

    #[test]
    fn test_no_cli_network_uses_contract() {
        assert_eq!(
            target_network(None, &contract(Some("ropsten"))),
            Some("ropsten".to_string())
        );
        assert_eq!(target_network(None, &contract(None)), None);
    }
}
