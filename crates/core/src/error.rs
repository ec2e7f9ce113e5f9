use std::path::PathBuf;

use thiserror::Error;

use crate::network::Network;

pub type Result<T> = std::result::Result<T, ScanError>;

/// Errors that abort a scan run.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("missing API keys for {network}: set {var} to a comma-separated list")]
    MissingApiKeys { network: Network, var: &'static str },

    #[error("unknown network `{0}`")]
    UnknownNetwork(String),

    #[error("{path}:{line}: expected `address,version` with a plain address, got `{row}`")]
    InvalidInput {
        path: PathBuf,
        line: usize,
        row: String,
    },

    #[error("request to {network} explorer failed: {source}")]
    Fetch {
        network: Network,
        #[source]
        source: reqwest::Error,
    },

    #[error("{network} explorer returned HTTP {status} for {address}")]
    HttpStatus {
        network: Network,
        address: String,
        status: u16,
    },

    #[error("malformed {network} explorer response for {address}: {reason}")]
    MalformedResponse {
        network: Network,
        address: String,
        reason: String,
    },

    #[error("cache error: {0}")]
    Cache(String),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScanError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure to match a delimiter run in [`crate::extract`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("no opening delimiter at byte {index}")]
    NotAnOpener { index: usize },

    #[error("delimiter opened at byte {index} is never closed ({depth} still open at end of text)")]
    Unbalanced { index: usize, depth: usize },
}
