use async_trait::async_trait;
use log::debug;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client, ClientBuilder, StatusCode,
};
use url::Url;

use crate::{config::TenderlyConfig, errors::RequestFailure};

use super::errors::ApiClientError;
use super::models::{ContractResponse, Error, TenderlyContractUploadRequest};
use super::TenderlyApi;

pub const ACCESS_KEY_HEADER: &str = "x-access-key";

#[derive(Clone)]
pub struct ApiClient {
    base: Url,
    client: Client,
}

impl ApiClient {
    /// # Errors
    ///
    /// Fails if provided `Url` cannot be a base. We rely on that
    /// invariant in other methods.
    pub fn new(base: Url, access_key: Option<&str>) -> Result<Self, ApiClientError> {
        Self::with_builder(base, access_key, Client::builder())
    }

    fn with_builder(
        base: Url,
        access_key: Option<&str>,
        builder: ClientBuilder,
    ) -> Result<Self, ApiClientError> {
        // Test here so that we are sure path_segments_mut succeeds
        if base.cannot_be_a_base() {
            return Err(ApiClientError::CannotBeBase(base));
        }

        let mut headers = HeaderMap::new();
        if let Some(key) = access_key {
            let mut value = HeaderValue::from_str(key)?;
            value.set_sensitive(true);
            headers.insert(ACCESS_KEY_HEADER, value);
        }

        let client = builder.default_headers(headers).build()?;
        Ok(Self { base, client })
    }

    /// # Errors
    ///
    /// Fails if the configured API url is malformed or cannot be a base.
    pub fn from_config(config: &TenderlyConfig) -> Result<Self, ApiClientError> {
        Self::new(Url::parse(&config.api_url)?, config.access_key.as_deref())
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ApiClientError> {
        let mut url = self.base.clone();
        let url_clone = url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiClientError::CannotBeBase(url_clone))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// # Errors
    ///
    /// Will return `Err` if the URL cannot be a base.
    pub fn verify_url(&self) -> Result<Url, ApiClientError> {
        self.url(&["api", "v1", "account", "me", "verify"])
    }

    /// # Errors
    ///
    /// Will return `Err` if the URL cannot be a base.
    pub fn push_url(&self, project: &str, username: &str) -> Result<Url, ApiClientError> {
        self.url(&[
            "api", "v1", "account", username, "project", project, "contracts",
        ])
    }

    async fn post(
        &self,
        url: Url,
        request: &TenderlyContractUploadRequest,
    ) -> Result<ContractResponse, ApiClientError> {
        debug!("Posting {} contracts to {url}", request.contracts.len());

        let response = self.client.post(url.clone()).json(request).send().await?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => (),
            StatusCode::BAD_REQUEST => {
                let body = response.text().await?;
                let msg = serde_json::from_str::<Error>(&body)
                    .map_or(body, |err| err.error.message);
                return Err(ApiClientError::from(RequestFailure::new(
                    url,
                    StatusCode::BAD_REQUEST,
                    msg,
                )));
            }
            status_code => {
                return Err(ApiClientError::from(RequestFailure::new(
                    url,
                    status_code,
                    response.text().await?,
                )));
            }
        }

        let text = response.text().await?;
        debug!("Raw API Response: {text}");

        let data: ContractResponse = serde_json::from_str(&text).map_err(|e| {
            ApiClientError::from(RequestFailure::new(
                url,
                StatusCode::OK,
                format!("Failed to parse JSON response: {e}"),
            ))
        })?;

        if data.has_mismatch() {
            let errors = data.bytecode_mismatch_errors.unwrap_or_default();
            return Err(ApiClientError::BytecodeMismatch(errors));
        }

        Ok(data)
    }
}

#[async_trait]
impl TenderlyApi for ApiClient {
    async fn verify_contracts(
        &self,
        request: &TenderlyContractUploadRequest,
    ) -> Result<ContractResponse, ApiClientError> {
        let url = self.verify_url()?;
        self.post(url, request).await
    }

    async fn push_contracts(
        &self,
        request: &TenderlyContractUploadRequest,
        project: &str,
        username: &str,
    ) -> Result<ContractResponse, ApiClientError> {
        let url = self.push_url(project, username)?;
        self.post(url, request).await
    }
}
