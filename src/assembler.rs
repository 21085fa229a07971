//! Builds Tenderly upload requests out of requested contracts, the host's
//! dependency graph and the compiler configuration.

use itertools::Itertools;
use log::{debug, warn};
use std::collections::BTreeMap;

use crate::{
    api::{
        ContractCompiler, ContractNetwork, TenderlyContract, TenderlyContractConfig,
        TenderlyContractUploadRequest,
    },
    config::HostConfig,
    contract::ContractByName,
    errors::AssemblyError,
    graph::{self, DependencyGraph, HostCompiler},
    networks,
    resolver::{self, Metadata, Visited},
};

/// A requested contract bound to the source file that defines it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractMatch<'a> {
    pub index: usize,
    pub contract: &'a ContractByName,
    pub source_name: String,
}

/// Source closure of the requested contracts, one entry per source file with
/// no networks attached yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredContracts<'a> {
    pub metadata: Metadata,
    pub matches: Vec<ContractMatch<'a>>,
    pub contracts: Vec<TenderlyContract>,
}

/// Binds every requested contract to the first resolved file carrying its
/// name and collects the source closure of all of them.
pub fn filter_contracts<'a>(
    graph: &DependencyGraph,
    compiler_version: &str,
    requested: &'a [ContractByName],
) -> FilteredContracts<'a> {
    let mut metadata = Metadata::new(compiler_version);
    let mut visited = Visited::new();
    let mut matches: Vec<ContractMatch<'a>> = vec![];

    for (index, contract) in requested.iter().enumerate() {
        let candidates = graph
            .resolved_files()
            .filter(|file| file.contract_name() == contract.name)
            .map(|file| file.source_name.as_str())
            .collect_vec();

        let Some((first, shadowed)) = candidates.split_first() else {
            debug!("No source file defines {}, dropping it", contract.name);
            continue;
        };

        if !shadowed.is_empty() {
            warn!(
                "Contract name {} matches several sources, using {first} and ignoring {}",
                contract.name,
                shadowed.join(", ")
            );
        }

        resolver::resolve_dependencies(graph, first, &mut metadata, &mut visited);
        matches.push(ContractMatch {
            index,
            contract,
            source_name: (*first).to_string(),
        });
    }

    let contracts = metadata
        .sources
        .iter()
        .map(|(source_path, source)| TenderlyContract {
            contract_name: graph::contract_name(source_path).to_string(),
            source: source.content.clone(),
            source_path: source_path.clone(),
            networks: BTreeMap::new(),
            compiler: ContractCompiler::solc(compiler_version),
        })
        .collect();

    FilteredContracts {
        metadata,
        matches,
        contracts,
    }
}

/// Network id every requested contract is deployed on. Fails for the whole
/// batch as soon as one contract has no usable network.
///
/// # Errors
///
/// Returns `MissingNetwork` if no network can be determined for a contract
/// and `UnsupportedNetwork` if Tenderly doesn't know the network.
pub fn contract_networks(
    cli_network: Option<&str>,
    contracts: &[ContractByName],
) -> Result<Vec<&'static str>, AssemblyError> {
    contracts
        .iter()
        .map(|contract| {
            let network = networks::target_network(cli_network, contract).ok_or_else(|| {
                AssemblyError::MissingNetwork {
                    contract: contract.name.clone(),
                }
            })?;

            networks::network_id(&network).ok_or_else(|| AssemblyError::UnsupportedNetwork {
                contract: contract.name.clone(),
                network,
            })
        })
        .collect()
}

/// # Errors
///
/// Will return `Err` if the host can't produce its dependency graph.
pub async fn get_contracts<'a, H: HostCompiler + ?Sized>(
    host: &H,
    config: &HostConfig,
    requested: &'a [ContractByName],
) -> Result<FilteredContracts<'a>, AssemblyError> {
    let graph = graph::resolve_graph(host).await?;
    debug!("Host resolved {} source files", graph.len());
    Ok(filter_contracts(
        &graph,
        &config.compiler_version(),
        requested,
    ))
}

pub fn compiler_config(config: &HostConfig) -> TenderlyContractConfig {
    let settings = &config.solidity.settings;
    TenderlyContractConfig {
        compiler_version: config.compiler_version(),
        optimizations_used: settings.optimizer.enabled,
        optimizations_count: settings.optimizer.runs,
        evm_version: settings.evm_version.clone(),
        libraries: settings.libraries.clone(),
    }
}

/// Assembles the upload request for `requested`.
///
/// # Errors
///
/// Will return `Err` if any contract lacks a supported network, in which
/// case the host isn't consulted at all, or if the host fails.
pub async fn get_contract_data<H: HostCompiler + ?Sized>(
    host: &H,
    config: &HostConfig,
    requested: &[ContractByName],
    tag: Option<String>,
) -> Result<TenderlyContractUploadRequest, AssemblyError> {
    let network_ids = contract_networks(config.network.as_deref(), requested)?;

    let FilteredContracts {
        matches,
        mut contracts,
        ..
    } = get_contracts(host, config, requested).await?;

    for found in &matches {
        if let Some(entry) = contracts
            .iter_mut()
            .find(|entry| entry.source_path == found.source_name)
        {
            entry.networks.insert(
                network_ids[found.index].to_string(),
                ContractNetwork {
                    address: found.contract.address.clone(),
                },
            );
        }
    }

    Ok(TenderlyContractUploadRequest {
        contracts,
        config: compiler_config(config),
        tag,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        address::Address,
        config::SolidityConfig,
        graph::{ResolvedFile, StaticHost},
    };
    use pretty_assertions::assert_eq;

    fn contract(name: &str, address: &str, network: Option<&str>) -> ContractByName {
        ContractByName::new(
            name,
            Address::new(address).unwrap(),
            network.map(ToString::to_string),
        )
    }

    fn config() -> HostConfig {
        HostConfig::new(SolidityConfig {
            version: semver::Version::new(0, 8, 0),
            settings: Default::default(),
        })
    }

    fn graph() -> DependencyGraph {
        vec![
            ResolvedFile::new(
                "contracts/Token.sol",
                "import \"./SafeMath.sol\"; contract Token {}",
                vec!["contracts/SafeMath.sol".to_string()],
            ),
            ResolvedFile::new(
                "contracts/Vault.sol",
                "import \"./SafeMath.sol\"; contract Vault {}",
                vec!["contracts/SafeMath.sol".to_string()],
            ),
            ResolvedFile::new("contracts/SafeMath.sol", "library SafeMath {}", vec![]),
            ResolvedFile::new("contracts/Other.sol", "contract Other {}", vec![]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_filter_drops_unmatched_contracts() {
        let requested = vec![contract("Missing", "0x1", Some("ropsten"))];
        let filtered = filter_contracts(&graph(), "0.8.0", &requested);

        assert!(filtered.matches.is_empty());
        assert!(filtered.contracts.is_empty());
        assert!(filtered.metadata.sources.is_empty());
    }

    #[test]
    fn test_filter_shares_common_imports() {
        let requested = vec![
            contract("Token", "0x1", Some("ropsten")),
            contract("Vault", "0x2", Some("ropsten")),
        ];
        let filtered = filter_contracts(&graph(), "0.8.0", &requested);

        let paths = filtered
            .contracts
            .iter()
            .map(|c| c.source_path.as_str())
            .collect_vec();
        assert_eq!(
            paths,
            vec![
                "contracts/SafeMath.sol",
                "contracts/Token.sol",
                "contracts/Vault.sol"
            ]
        );
        assert_eq!(filtered.matches.len(), 2);
    }

    #[test]
    fn test_first_matching_source_wins() {
        let graph: DependencyGraph = vec![
            ResolvedFile::new("contracts/a/Token.sol", "contract Token { a }", vec![]),
            ResolvedFile::new("contracts/b/Token.sol", "contract Token { b }", vec![]),
        ]
        .into_iter()
        .collect();
        let requested = vec![contract("Token", "0x1", None)];

        let filtered = filter_contracts(&graph, "0.8.0", &requested);
        assert_eq!(filtered.matches[0].source_name, "contracts/a/Token.sol");
        assert_eq!(filtered.contracts.len(), 1);
    }

    #[test]
    fn test_contract_networks_all_or_nothing() {
        let requested = vec![
            contract("Token", "0x1", Some("ropsten")),
            contract("Vault", "0x2", None),
        ];
        assert!(matches!(
            contract_networks(None, &requested),
            Err(AssemblyError::MissingNetwork { contract }) if contract == "Vault"
        ));
        assert_eq!(
            contract_networks(Some("mainnet"), &requested).unwrap(),
            vec!["1", "1"]
        );
    }

    #[test]
    fn test_contract_networks_unsupported() {
        let requested = vec![contract("Token", "0x1", Some("hardhat"))];
        assert!(matches!(
            contract_networks(None, &requested),
            Err(AssemblyError::UnsupportedNetwork { network, .. }) if network == "hardhat"
        ));
    }

    #[tokio::test]
    async fn test_get_contract_data_attaches_networks() {
        let host = StaticHost::new(graph());
        let requested = vec![
            contract("Token", "0xabc", Some("ropsten")),
            contract("Token", "0xdef", Some("kovan")),
        ];

        let request = get_contract_data(&host, &config(), &requested, None)
            .await
            .unwrap();

        let token = request
            .contracts
            .iter()
            .find(|c| c.contract_name == "Token")
            .unwrap();
        assert_eq!(
            token.networks,
            BTreeMap::from([
                (
                    "3".to_string(),
                    ContractNetwork {
                        address: Address::new("0xabc").unwrap()
                    }
                ),
                (
                    "42".to_string(),
                    ContractNetwork {
                        address: Address::new("0xdef").unwrap()
                    }
                ),
            ])
        );
        let safe_math = request
            .contracts
            .iter()
            .find(|c| c.contract_name == "SafeMath")
            .unwrap();
        assert!(safe_math.networks.is_empty());
        assert_eq!(request.config.compiler_version, "0.8.0");
    }

    #[tokio::test]
    async fn test_empty_request_is_not_an_error() {
        let host = StaticHost::new(graph());
        let request = get_contract_data(&host, &config(), &[], None).await.unwrap();

        assert!(request.contracts.is_empty());
        assert_eq!(request.config.compiler_version, "0.8.0");
    }

    #[test]
    fn test_compiler_config_from_settings() {
        let mut config = config();
        config.solidity.settings.optimizer.enabled = true;
        config.solidity.settings.optimizer.runs = Some(200);
        config.solidity.settings.evm_version = Some("istanbul".to_string());

        assert_eq!(
            compiler_config(&config),
            TenderlyContractConfig {
                compiler_version: "0.8.0".to_string(),
                optimizations_used: true,
                optimizations_count: Some(200),
                evm_version: Some("istanbul".to_string()),
                libraries: Default::default(),
            }
        );
    }
}
