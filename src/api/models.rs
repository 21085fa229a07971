use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{address::Address, config::Libraries};

pub const SOLC: &str = "solc";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractNetwork {
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCompiler {
    pub name: String,
    pub version: String,
}

impl ContractCompiler {
    pub fn solc(version: impl Into<String>) -> Self {
        Self {
            name: SOLC.to_string(),
            version: version.into(),
        }
    }
}

/// One source file of an upload request. Networks are only filled for the
/// files that define a requested contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderlyContract {
    pub contract_name: String,
    pub source: String,
    pub source_path: String,
    pub networks: BTreeMap<String, ContractNetwork>,
    pub compiler: ContractCompiler,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenderlyContractConfig {
    pub compiler_version: String,
    pub optimizations_used: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimizations_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evm_version: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub libraries: Libraries,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenderlyContractUploadRequest {
    pub contracts: Vec<TenderlyContract>,
    pub config: TenderlyContractConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// Build artifact as written to the local deployments directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderlyArtifact {
    pub metadata: String,
    pub address: Address,
    pub bytecode: String,
    pub deployed_bytecode: String,
    pub abi: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct Error {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiContract {
    #[serde(default)]
    pub id: Option<String>,
    pub contract_name: String,
    pub address: String,
    pub network_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BytecodeMismatchError {
    pub contract_id: String,
    #[serde(default)]
    pub expected: Option<String>,
    #[serde(default)]
    pub got: Option<String>,
    #[serde(default)]
    pub similarity: Option<u64>,
    #[serde(default)]
    pub assumed_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContractResponse {
    #[serde(default)]
    pub contracts: Vec<ApiContract>,
    #[serde(default)]
    pub bytecode_mismatch_errors: Option<Vec<BytecodeMismatchError>>,
}

impl ContractResponse {
    pub fn has_mismatch(&self) -> bool {
        self.bytecode_mismatch_errors
            .as_ref()
            .is_some_and(|errors| !errors.is_empty())
    }
}
