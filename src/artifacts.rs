use camino::{Utf8Path, Utf8PathBuf};
use itertools::Itertools;
use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    api::TenderlyArtifact,
    assembler,
    config::HostConfig,
    contract::ContractByName,
    graph::DependencyGraph,
    resolver::{self, Metadata, Visited},
};

pub const DEPLOYMENTS_DIR: &str = "deployments";
pub const LOCAL_DEPLOYMENTS: &str = "localhost_5777";

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("[E060] I/O error on artifact '{path}': {error}\n\nSuggestions:\n  • Compile the contracts before persisting artifacts\n  • Check file permissions")]
    Io { path: Utf8PathBuf, error: String },

    #[error("[E061] Malformed artifact '{path}': {error}")]
    Json { path: Utf8PathBuf, error: String },
}

impl ArtifactError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "E060",
            Self::Json { .. } => "E061",
        }
    }
}

/// The parts of a compiler output artifact this tool reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledArtifact {
    pub contract_name: Option<String>,
    pub abi: serde_json::Value,
    pub bytecode: String,
    pub deployed_bytecode: String,
}

/// `<artifacts>/<source name>/<contract>.json`
pub fn artifact_path(artifacts_dir: &Utf8Path, source_name: &str, contract: &str) -> Utf8PathBuf {
    artifacts_dir.join(source_name).join(format!("{contract}.json"))
}

pub fn deployment_path(root: &Utf8Path, contract: &str) -> Utf8PathBuf {
    root.join(DEPLOYMENTS_DIR)
        .join(LOCAL_DEPLOYMENTS)
        .join(format!("{contract}.json"))
}

/// # Errors
///
/// Will return `Err` if the artifact can't be read or parsed.
pub async fn read_artifact(path: &Utf8Path) -> Result<CompiledArtifact, ArtifactError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ArtifactError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

    serde_json::from_str(&content).map_err(|e| ArtifactError::Json {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Writes a deployment artifact for every requested contract that has a
/// compiled artifact on disk and returns the written paths. A contract is
/// bound to the same source file the upload request uses.
///
/// # Errors
///
/// Will return `Err` if an existing artifact can't be read or the
/// deployment file can't be written.
pub async fn persist_artifacts(
    graph: &DependencyGraph,
    config: &HostConfig,
    contracts: &[ContractByName],
) -> Result<Vec<Utf8PathBuf>, ArtifactError> {
    let artifacts_dir = config.paths.artifacts_dir();
    let mut written: Vec<Utf8PathBuf> = vec![];

    let bound = assembler::filter_contracts(graph, &config.compiler_version(), contracts);
    for found in bound.matches.iter().unique_by(|m| m.contract.name.clone()) {
        let contract = found.contract;
        let name = contract.name.as_str();

        let source = artifact_path(&artifacts_dir, &found.source_name, name);
        if !source.is_file() {
            debug!("No compiled artifact at {source}, skipping {name}");
            continue;
        }

        let compiled = read_artifact(&source).await?;

        let mut metadata = Metadata::new(config.compiler_version());
        let mut visited = Visited::new();
        resolver::resolve_dependencies(graph, &found.source_name, &mut metadata, &mut visited);

        let artifact = TenderlyArtifact {
            metadata: serde_json::to_string(&metadata).map_err(|e| ArtifactError::Json {
                path: source.clone(),
                error: e.to_string(),
            })?,
            address: contract.address.clone(),
            bytecode: compiled.bytecode,
            deployed_bytecode: compiled.deployed_bytecode,
            abi: compiled.abi,
        };

        let destination = deployment_path(&config.paths.root, name);
        write_artifact(&destination, &artifact).await?;
        info!("Persisted {name} artifact to {destination}");
        written.push(destination);
    }

    Ok(written)
}

async fn write_artifact(path: &Utf8Path, artifact: &TenderlyArtifact) -> Result<(), ArtifactError> {
    let io_error = |e: std::io::Error| ArtifactError::Io {
        path: path.to_path_buf(),
        error: e.to_string(),
    };

    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir).await.map_err(io_error)?;
    }

    let content = serde_json::to_string_pretty(artifact).map_err(|e| ArtifactError::Json {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    tokio::fs::write(path, content).await.map_err(io_error)
}
