use thiserror::Error;
use url::Url;

use crate::errors::RequestFailure;

use super::models::BytecodeMismatchError;

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("[E006] Invalid base URL: {0}\n\nSuggestions:\n  • Provide a valid HTTP or HTTPS URL\n  • Example: https://api.tenderly.co\n  • Ensure the URL includes the protocol (http:// or https://)")]
    CannotBeBase(Url),

    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error(transparent)]
    Failure(#[from] RequestFailure),

    #[error("[E007] Bytecode mismatch detected for {}, contract verification failed", mismatched_ids(.0))]
    BytecodeMismatch(Vec<BytecodeMismatchError>),

    #[error("[E008] Invalid header value for access key")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    #[error("[E009] Invalid URL format: {0}\n\nSuggestions:\n  • Check the URL format is correct\n  • Use absolute URLs with protocol (http:// or https://)")]
    UrlParse(#[from] url::ParseError),
}

fn mismatched_ids(errors: &[BytecodeMismatchError]) -> String {
    errors
        .iter()
        .map(|e| e.contract_id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl ApiClientError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::CannotBeBase(_) => "E006",
            Self::Reqwest(_) => "E999",
            Self::Failure(f) => f.error_code(),
            Self::BytecodeMismatch(_) => "E007",
            Self::Header(_) => "E008",
            Self::UrlParse(_) => "E009",
        }
    }
}
