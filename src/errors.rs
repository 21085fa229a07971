use reqwest::StatusCode;
use std::fmt::{self, Formatter};
use thiserror::Error;
use url::Url;

use crate::{api::ApiClientError, artifacts::ArtifactError, graph::HostError, networks};

#[derive(Debug, Error)]
pub struct RequestFailure {
    pub url: Url,
    pub status: StatusCode,
    pub msg: String,
}

impl RequestFailure {
    pub fn new(url: Url, status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            url,
            status,
            msg: msg.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self.status.as_u16() {
            400 => "E010",
            401 | 403 => "E011",
            404 => "E012",
            _ => "E013",
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self.status.as_u16() {
            401 | 403 => Some("Check the access key in tenderly.toml or TENDERLY_ACCESS_KEY"),
            404 => Some("Check the Tenderly project and username"),
            429 => Some("Wait a moment before retrying"),
            _ => None,
        }
    }
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(
            formatter,
            "[{}] {} returned {}, with: {}",
            self.error_code(),
            self.url,
            self.status,
            self.msg
        )?;
        if let Some(suggestion) = self.suggestion() {
            write!(formatter, " ({suggestion})")?;
        }
        Ok(())
    }
}

/// Host configuration a push needs but which wasn't provided.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MissingConfig {
    #[error("[E001] Tenderly project is not configured, set `project` in the [tenderly] section of tenderly.toml")]
    Project,

    #[error("[E002] Tenderly username is not configured, set `username` in the [tenderly] section of tenderly.toml")]
    Username,
}

impl MissingConfig {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Project => "E001",
            Self::Username => "E002",
        }
    }
}

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("[E003] No network found for contract {contract}, pass --network or declare it as NAME=ADDRESS@NETWORK")]
    MissingNetwork { contract: String },

    #[error("[E004] Network {network} of contract {contract} is not supported by Tenderly")]
    UnsupportedNetwork { contract: String, network: String },

    #[error(transparent)]
    Host(#[from] HostError),
}

impl AssemblyError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingNetwork { .. } => "E003",
            Self::UnsupportedNetwork { .. } => "E004",
            Self::Host(err) => err.error_code(),
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnsupportedNetwork { .. } => {
                vec![format!(
                    "Supported networks: {}",
                    networks::supported_networks().join(", ")
                )]
            }
            Self::MissingNetwork { .. } | Self::Host(_) => vec![],
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    MissingConfig(#[from] MissingConfig),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Api(#[from] ApiClientError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

impl Error {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingConfig(err) => err.error_code(),
            Self::Assembly(err) => err.error_code(),
            Self::Api(err) => err.error_code(),
            Self::Artifact(err) => err.error_code(),
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Assembly(err) => err.suggestions(),
            Self::MissingConfig(_) | Self::Api(_) | Self::Artifact(_) => vec![],
        }
    }
}
