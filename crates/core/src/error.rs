// ABOUTME: Error types for showing retrieval, caching, and configuration.
// ABOUTME: Provides the KinopyError enum and the crate-wide Result alias.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching, caching, or rendering showings.
#[derive(Debug, Error)]
pub enum KinopyError {
    /// The request could not be sent or its body could not be read.
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("unexpected HTTP status {status} from {url}")]
    Status { url: String, status: u16 },

    /// The response was retrieved but did not have the expected shape.
    #[error("unexpected data from {provider}: {message}")]
    Schema { provider: String, message: String },

    /// Reading or writing a cache file failed.
    #[error("cache I/O failed at {}: {source}", path.display())]
    CacheIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A cache file exists but could not be decoded.
    #[error("corrupt cache file {}: {source}", path.display())]
    CacheDecode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The config file could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for the expected schema.
    #[error("failed to parse config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Writing a rendered page or one of its assets failed.
    #[error("failed to write {}: {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSS selector failed to compile.
    #[error("invalid selector {0:?}")]
    Selector(String),
}

impl KinopyError {
    /// Creates a Schema error for the given provider.
    pub fn schema(provider: impl Into<String>, message: impl fmt::Display) -> Self {
        KinopyError::Schema {
            provider: provider.into(),
            message: message.to_string(),
        }
    }

    /// Creates a Fetch error from an underlying reqwest error.
    pub fn fetch(url: impl Into<String>, source: reqwest::Error) -> Self {
        KinopyError::Fetch {
            url: url.into(),
            source,
        }
    }

    /// Returns true if the error came from the network layer.
    pub fn is_fetch(&self) -> bool {
        matches!(self, KinopyError::Fetch { .. } | KinopyError::Status { .. })
    }

    /// Returns true if the error came from unexpected response data.
    pub fn is_schema(&self) -> bool {
        matches!(self, KinopyError::Schema { .. })
    }
}

pub type Result<T> = std::result::Result<T, KinopyError>;
