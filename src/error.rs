// src/error.rs
//! Error taxonomy for the fetch/merge pipeline.

use std::fmt;

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Upstream collaborator that produced (or failed to produce) a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    Sleeper,
    KeepTradeCut,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Sleeper => f.write_str("Sleeper"),
            Provider::KeepTradeCut => f.write_str("KeepTradeCut"),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    /// An upstream source returned no usable data (network failure,
    /// page-structure change, empty payload). Never retried here.
    #[error("{provider} unavailable: {reason}")]
    ProviderUnavailable { provider: Provider, reason: String },

    /// An input table has no column usable as identity or position.
    #[error("Schema error: {0}")]
    Schema(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub fn unavailable(provider: Provider, reason: impl Into<String>) -> Self {
        Error::ProviderUnavailable { provider, reason: reason.into() }
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Error::Schema(msg.into())
    }

    pub fn is_provider_unavailable(&self) -> bool {
        matches!(self, Error::ProviderUnavailable { .. })
    }
}
