use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::{collections::BTreeMap, fs};
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.tenderly.co";
pub const ACCESS_KEY_ENV: &str = "TENDERLY_ACCESS_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("[E050] Failed to read configuration file '{path}': {error}\n\nSuggestions:\n  • Check that tenderly.toml exists in the project root\n  • Use --config to point at the configuration file")]
    Io { path: Utf8PathBuf, error: String },

    #[error("[E051] Failed to parse configuration file '{path}': {error}\n\nSuggestions:\n  • Check TOML syntax is valid\n  • Verify that [solidity] declares a semver compiler version")]
    Parse { path: Utf8PathBuf, error: String },
}

impl ConfigError {
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "E050",
            Self::Parse { .. } => "E051",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TenderlyConfig {
    pub project: Option<String>,
    pub username: Option<String>,
    pub access_key: Option<String>,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for TenderlyConfig {
    fn default() -> Self {
        Self {
            project: None,
            username: None,
            access_key: None,
            api_url: default_api_url(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OptimizerConfig {
    #[serde(default)]
    pub enabled: bool,
    pub runs: Option<u32>,
}

/// Library addresses keyed by the source file declaring them, then by
/// library name.
pub type Libraries = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SolcSettings {
    #[serde(default)]
    pub optimizer: OptimizerConfig,
    pub evm_version: Option<String>,
    #[serde(default)]
    pub libraries: Libraries,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SolidityConfig {
    pub version: semver::Version,
    #[serde(default)]
    pub settings: SolcSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_root")]
    pub root: Utf8PathBuf,
    #[serde(default = "default_sources")]
    pub sources: Utf8PathBuf,
    #[serde(default = "default_artifacts")]
    pub artifacts: Utf8PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            sources: default_sources(),
            artifacts: default_artifacts(),
        }
    }
}

impl PathsConfig {
    pub fn artifacts_dir(&self) -> Utf8PathBuf {
        self.root.join(&self.artifacts)
    }
}

fn default_root() -> Utf8PathBuf {
    Utf8PathBuf::from(".")
}

fn default_sources() -> Utf8PathBuf {
    Utf8PathBuf::from("contracts")
}

fn default_artifacts() -> Utf8PathBuf {
    Utf8PathBuf::from("artifacts")
}

/// Everything read from the host project. Loaded once and then only read.
#[derive(Debug, Clone, Deserialize)]
pub struct HostConfig {
    pub network: Option<String>,
    #[serde(default)]
    pub tenderly: TenderlyConfig,
    pub solidity: SolidityConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

impl HostConfig {
    pub fn new(solidity: SolidityConfig) -> Self {
        Self {
            network: None,
            tenderly: TenderlyConfig::default(),
            solidity,
            paths: PathsConfig::default(),
        }
    }

    /// # Errors
    ///
    /// Will return `Err` if the file can't be read or isn't a valid
    /// configuration.
    pub fn from_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let mut config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        // Relative roots are relative to the configuration file
        if config.paths.root.is_relative() {
            if let Some(dir) = path.parent() {
                config.paths.root = dir.join(&config.paths.root);
            }
        }

        if let Ok(key) = std::env::var(ACCESS_KEY_ENV) {
            config.tenderly.access_key = Some(key);
        }

        Ok(config)
    }

    pub fn compiler_version(&self) -> String {
        self.solidity.version.to_string()
    }
}
