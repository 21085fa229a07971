use camino::Utf8PathBuf;

use tenderly::contract::ContractByName;

fn contract_value_parser(raw: &str) -> Result<ContractByName, String> {
    raw.parse::<ContractByName>().map_err(|err| err.to_string())
}

fn tag_value_parser(tag: &str) -> Result<String, String> {
    if tag.trim().is_empty() {
        return Err("Tag cannot be empty".to_string());
    }

    if tag.len() > 100 {
        return Err("Tag cannot exceed 100 characters".to_string());
    }

    Ok(tag.to_string())
}

#[derive(clap::Parser)]
#[command(name = "tenderly")]
#[command(version)]
#[command(about = "Push and verify compiled Solidity contracts on Tenderly")]
#[command(long_about = "
A command-line tool for pushing compiled Solidity contracts to Tenderly.

Contracts are given as NAME=ADDRESS, optionally followed by @NETWORK when
--network isn't used. The source closure of every contract is collected from
the project sources and submitted together with the compiler settings from
tenderly.toml.

Examples:
  # Verify a contract deployed on ropsten
  tenderly verify Token=0x5FbDB2315678afecb367f032d93F642f64180aa3@ropsten

  # Push two contracts to the configured project on mainnet
  tenderly --network mainnet push Token=0x5FbD... Vault=0xe7f1...

  # Write deployment artifacts for a local deployment
  tenderly persist Token=0x5FbDB2315678afecb367f032d93F642f64180aa3
")]
pub struct Args {
    /// Path to tenderly.toml
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        value_hint = clap::ValueHint::FilePath,
        default_value = "tenderly.toml"
    )]
    pub config: Utf8PathBuf,

    /// Network the contracts are deployed on, overrides tenderly.toml.
    /// `local` defers to the network given with each contract
    #[arg(long, global = true, value_name = "NETWORK")]
    pub network: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Verify contracts against their deployed bytecode
    Verify(UploadArgs),

    /// Push contracts to the configured Tenderly project
    ///
    /// Requires `project` and `username` in the [tenderly] section of
    /// tenderly.toml.
    Push(UploadArgs),

    /// Write deployment artifacts to deployments/localhost_5777
    Persist(PersistArgs),
}

#[derive(clap::Args)]
pub struct UploadArgs {
    /// Contracts as NAME=ADDRESS or NAME=ADDRESS@NETWORK
    #[arg(
        value_name = "CONTRACT",
        required = true,
        value_parser = contract_value_parser
    )]
    pub contracts: Vec<ContractByName>,

    /// Tag attached to the uploaded contracts
    #[arg(long, value_parser = tag_value_parser)]
    pub tag: Option<String>,
}

#[derive(clap::Args)]
pub struct PersistArgs {
    /// Contracts as NAME=ADDRESS
    #[arg(
        value_name = "CONTRACT",
        required = true,
        value_parser = contract_value_parser
    )]
    pub contracts: Vec<ContractByName>,
}
