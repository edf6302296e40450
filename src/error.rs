//! Error types for every stage of a run.
//!
//! Each concern gets its own enum so callers can tell a registry mistake from
//! a flaky feed from a broken state file.  `main` wraps whatever reaches it in
//! [`anyhow`] with context; nothing below the binary edge uses `anyhow`.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Rejections from [`SourceRegistry::add`](crate::registry::SourceRegistry::add).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("source address cannot be empty")]
    EmptyAddress,

    #[error("source address already registered: {0}")]
    DuplicateAddress(String),
}

/// Why a transport-level fetch failed.
#[derive(Debug, Error)]
pub enum FetchCause {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(StatusCode),
}

/// Failure of a single source.  Caught at the worker boundary; never aborts
/// the run.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("fetching {address} failed: {cause}")]
    Fetch {
        address: String,
        #[source]
        cause: FetchCause,
    },

    #[error("parsing feed from {address} failed: {source}")]
    Parse {
        address: String,
        #[source]
        source: rss::Error,
    },

    #[error("fetcher panicked on {address}: {message}")]
    Panicked { address: String, message: String },
}

impl SourceError {
    /// Short label used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceError::Fetch { .. } => "fetch",
            SourceError::Parse { .. } => "parse",
            SourceError::Panicked { .. } => "panic",
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            SourceError::Fetch {
                cause: FetchCause::Transport(e),
                ..
            } if e.is_timeout()
        )
    }
}

/// Misses on the read-only query surface of a
/// [`ResultIndex`](crate::index::ResultIndex).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("no source produced new items in this run")]
    EmptyResultSet,

    #[error("not found: {0}")]
    NotFound(String),
}

/// Startup failures reading the sources file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read sources file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid sources file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Failures reading or writing the durable files.
///
/// `Read`/`Decode` happen at startup; `Encode`/`Write` happen when persisting
/// and mean dedup progress from this run was not saved.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot encode data for {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// True for failures that happened while persisting.
    pub fn is_persistence(&self) -> bool {
        matches!(self, StoreError::Encode { .. } | StoreError::Write { .. })
    }
}
