use std::path::PathBuf;

use url::Url;

use crate::reqwest::{ReqwestErrorContext, ReqwestInnerError, ReqwestStage};

pub type Result<T> = std::result::Result<T, UtilsError>;

#[derive(Debug, thiserror::Error)]
pub enum UtilsError {
    #[error("Covalent API key not set, pass --covalent-api-key, set COVALENT_API_KEY or add it to the config.")]
    CovalentApiKeyNotSet,

    #[error("RPC URL not set for network {0}, pass --rpc-url, set RPC_URL or RPC_API_KEY, or add it to the config.")]
    RpcUrlNotSet(String),

    #[error("Collection contract not set, pass --contract, set BAYC_CONTRACT or add it to the config.")]
    ContractNotSet,

    #[error("Network not found: {0}.")]
    NetworkNotFound(String),

    #[error("Address '{0}' is not a valid Ethereum address.")]
    InvalidAddress(String),

    #[error("Covalent API returned an error (code {code:?}): {message}")]
    CovalentApi { code: Option<u16>, message: String },

    #[error("Failed to parse Covalent response: {0}.")]
    CovalentResponse(&'static str),

    #[error("Balance '{0}' is not a decimal integer.")]
    InvalidBalance(String),

    #[error("JSON-RPC call {method} failed. (Error: {error})")]
    RpcFailed {
        method: &'static str,
        error: alloy::transports::TransportError,
    },

    #[error("Failed to get base directories.")]
    BaseDirsFailed,

    #[error("Failed to create directory: {0:?}. (Error: {1:?})")]
    CreateDirAllFailed(PathBuf, std::io::Error),

    #[error("Failed to read the file: {0}. (Error: {1:?})")]
    FileReadFailed(PathBuf, std::io::Error),

    #[error("Failed to write to the file: {0}. (Error: {1:?})")]
    FileWriteFailed(PathBuf, std::io::Error),

    #[error("Parsing the toml file failed: {0}. (Error: {1:?})")]
    TomlParsingFailed(PathBuf, toml::de::Error),

    #[error("Formatting to toml format failed: {0}. (Error: {1:?})")]
    TomlFormattingFailed(String, toml::ser::Error),

    #[error("Failed to parse URL: {0}. (Error: {1:?})")]
    UrlParsingFailed(String, url::ParseError),

    #[error("Please check your internet connection, the URL seems to be unreachable: {0}")]
    Internet(Url),

    #[error("Request '{url}' failed at stage '{stage:?}' (Error='{inner:?}', Context='{context:?}')", url = context.url)]
    ReqwestFailed {
        stage: ReqwestStage,
        context: Box<ReqwestErrorContext>,
        inner: ReqwestInnerError,
    },

    #[error("Reqwest builder missing error context, this is a bug please report it.")]
    ReqwestErrorContextMissing,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl UtilsError {
    pub fn is_connect(&self) -> bool {
        match self {
            Self::Internet(_) => true,
            Self::ReqwestFailed { inner, .. } => inner.is_connect(),
            _ => false,
        }
    }
}
