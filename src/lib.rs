//! # Tenderly Verifier
//!
//! Pushes compiled Solidity contracts to Tenderly and asks it to verify
//! them. Sources are never compiled here: the build host hands over a
//! resolved dependency graph, and this crate turns it into upload requests.
//!
//! ## Features
//!
//! - **Source closure**: every file a contract imports, transitively, is
//!   submitted so Tenderly can recompile it
//! - **Network mapping**: network names are translated to Tenderly network ids
//! - **Verify and push**: public verification or upload to a project
//! - **Local artifacts**: deployment artifacts written to `deployments/`
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use tenderly::{
//!     api::ApiClient, config::HostConfig, contract::ContractByName, host::FsHost,
//!     tenderly::Tenderly,
//! };
//! use camino::Utf8Path;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HostConfig::from_file(Utf8Path::new("tenderly.toml"))?;
//! let host = FsHost::from_config(&config.paths);
//! let api = ApiClient::from_config(&config.tenderly)?;
//! let tenderly = Tenderly::new(host, api, config);
//!
//! let token: ContractByName = "Token=0x5FbDB2315678afecb367f032d93F642f64180aa3@ropsten".parse()?;
//! tenderly.verify(&[token], None).await;
//! # Ok(())
//! # }
//! ```

/// Contract address validation
pub mod address;

/// Tenderly API client and request types
pub mod api;

/// Local build and deployment artifacts
pub mod artifacts;

/// Upload request assembly
pub mod assembler;

/// Host project configuration
pub mod config;

/// Requested contracts
pub mod contract;

/// Error types shared across operations
pub mod errors;

/// Resolved source graph and the build host seam
pub mod graph;

/// Filesystem build host
pub mod host;

/// Network name to Tenderly network id mapping
pub mod networks;

/// Source closure resolution
pub mod resolver;

/// Verify, push and persist operations
pub mod tenderly;
