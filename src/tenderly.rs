use camino::Utf8PathBuf;
use log::{error, info};

use crate::{
    api::{ContractResponse, TenderlyApi},
    artifacts,
    assembler,
    config::HostConfig,
    contract::ContractByName,
    errors::{AssemblyError, Error, MissingConfig},
    graph::{self, HostCompiler},
};

pub const DASHBOARD_URL: &str = "https://dashboard.tenderly.co";

/// Entry point for verify, push and persist. Each call assembles its own
/// request, nothing is shared between calls but the read-only config.
pub struct Tenderly<H, A> {
    host: H,
    api: A,
    config: HostConfig,
}

impl<H: HostCompiler, A: TenderlyApi> Tenderly<H, A> {
    pub fn new(host: H, api: A, config: HostConfig) -> Self {
        Self { host, api, config }
    }

    /// # Errors
    ///
    /// Will return `Err` if the request can't be assembled or the remote
    /// call fails. Returns `Ok(None)` when there was nothing to send.
    pub async fn try_verify(
        &self,
        contracts: &[ContractByName],
        tag: Option<String>,
    ) -> Result<Option<ContractResponse>, Error> {
        let request =
            assembler::get_contract_data(&self.host, &self.config, contracts, tag).await?;
        if request.contracts.is_empty() {
            info!("No matching contracts found, nothing to verify");
            return Ok(None);
        }

        Ok(Some(self.api.verify_contracts(&request).await?))
    }

    /// # Errors
    ///
    /// Will return `Err` if project or username isn't configured, the
    /// request can't be assembled or the remote call fails.
    pub async fn try_push(
        &self,
        contracts: &[ContractByName],
        tag: Option<String>,
    ) -> Result<Option<ContractResponse>, Error> {
        let (project, username) = self.push_target()?;

        let request =
            assembler::get_contract_data(&self.host, &self.config, contracts, tag).await?;
        if request.contracts.is_empty() {
            info!("No matching contracts found, nothing to push");
            return Ok(None);
        }

        Ok(Some(
            self.api
                .push_contracts(&request, project, username)
                .await?,
        ))
    }

    /// Verifies `contracts`, logging the outcome. Failures are logged and
    /// never returned.
    pub async fn verify(&self, contracts: &[ContractByName], tag: Option<String>) {
        match self.try_verify(contracts, tag).await {
            Ok(Some(response)) => report(&response, "verified", |network, address| {
                format!("{DASHBOARD_URL}/contract/{network}/{address}")
            }),
            Ok(None) => (),
            Err(err) => log_failure("Contract verification failed", &err),
        }
    }

    /// Pushes `contracts` to the configured project, logging the outcome.
    /// Failures are logged and never returned.
    pub async fn push(&self, contracts: &[ContractByName], tag: Option<String>) {
        match self.try_push(contracts, tag).await {
            Ok(Some(response)) => {
                let project = self.config.tenderly.project.as_deref().unwrap_or_default();
                let username = self.config.tenderly.username.as_deref().unwrap_or_default();
                report(&response, "pushed", |network, address| {
                    format!("{DASHBOARD_URL}/{username}/{project}/contract/{network}/{address}")
                });
            }
            Ok(None) => (),
            Err(err) => log_failure("Contract push failed", &err),
        }
    }

    /// Writes deployment artifacts for `contracts` to the local
    /// deployments directory.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the host fails or an artifact can't be read or
    /// written.
    pub async fn persist_artifacts(
        &self,
        contracts: &[ContractByName],
    ) -> Result<Vec<Utf8PathBuf>, Error> {
        let graph = graph::resolve_graph(&self.host)
            .await
            .map_err(AssemblyError::from)?;
        Ok(artifacts::persist_artifacts(&graph, &self.config, contracts).await?)
    }

    fn push_target(&self) -> Result<(&str, &str), MissingConfig> {
        let project = self
            .config
            .tenderly
            .project
            .as_deref()
            .ok_or(MissingConfig::Project)?;
        let username = self
            .config
            .tenderly
            .username
            .as_deref()
            .ok_or(MissingConfig::Username)?;
        Ok((project, username))
    }
}

fn log_failure(context: &str, err: &Error) {
    error!("{context}: {err}");
    for suggestion in err.suggestions() {
        error!("  • {suggestion}");
    }
}

fn report(response: &ContractResponse, action: &str, link: impl Fn(&str, &str) -> String) {
    if response.contracts.is_empty() {
        info!("No new contracts {action}");
        return;
    }

    info!("Smart contracts successfully {action}:");
    for contract in &response.contracts {
        info!(
            "• {}, {}, {}",
            contract.contract_name,
            contract.address,
            link(&contract.network_id, &contract.address)
        );
    }
}
