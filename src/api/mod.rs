use async_trait::async_trait;

// Re-export the API module components
pub use self::{
    client::ApiClient,
    errors::ApiClientError,
    models::{
        ApiContract, BytecodeMismatchError, ContractCompiler, ContractNetwork, ContractResponse,
        TenderlyArtifact, TenderlyContract, TenderlyContractConfig, TenderlyContractUploadRequest,
    },
};

// Module declarations
mod client;
mod errors;
mod models;

/// Remote side of verify and push.
#[async_trait]
pub trait TenderlyApi: Send + Sync {
    async fn verify_contracts(
        &self,
        request: &TenderlyContractUploadRequest,
    ) -> Result<ContractResponse, ApiClientError>;

    async fn push_contracts(
        &self,
        request: &TenderlyContractUploadRequest,
        project: &str,
        username: &str,
    ) -> Result<ContractResponse, ApiClientError>;
}
