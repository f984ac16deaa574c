//! Error types.
//!
//! [`ApiError`] is the single shape every provider failure takes on its way to
//! the aggregator, whether the request never got a response, came back with a
//! non-2xx status, or returned a body flagged as an error. Adapters stamp their
//! [`Source`] on it so failures can be attributed per provider.

use crate::models::Source;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Message used when nothing more specific is known.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Message used when a request produced no response at all.
pub const NO_RESPONSE_MESSAGE: &str =
    "No response received from the server. Please check your connection.";

/// A failed provider call.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{}", display_api_error(.message, .provider))]
pub struct ApiError {
    pub message: String,
    /// HTTP status when the provider responded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// The adapter that produced the error, once known. Serialized as `source`.
    #[serde(
        rename = "source",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_source"
    )]
    pub provider: Option<Source>,
}

impl ApiError {
    /// Unattributed error with no HTTP status.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            provider: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Attribute the error to `source` unless it already is.
    pub fn with_source(mut self, source: Source) -> Self {
        self.provider.get_or_insert(source);
        self
    }

    /// Transport failure: no response, no status.
    pub fn no_response() -> Self {
        Self::new(NO_RESPONSE_MESSAGE)
    }

    /// Raised before any request when `source` has no configured key.
    pub fn missing_api_key(source: Source) -> Self {
        Self::new(format!("{source} API key is not configured")).with_source(source)
    }

    /// Provider answered 2xx but with a body we could not decode.
    pub fn malformed(source: Source, err: &serde_json::Error) -> Self {
        Self::new(format!("{source} returned a malformed response: {err}")).with_source(source)
    }
}

fn display_api_error(message: &str, provider: &Option<Source>) -> String {
    match provider {
        Some(source) => format!("{source}: {message}"),
        None => message.to_string(),
    }
}

fn serialize_source<S: serde::Serializer>(source: &Option<Source>, s: S) -> Result<S::Ok, S::Error> {
    match source {
        Some(source) => s.serialize_str(source.display_name()),
        None => s.serialize_none(),
    }
}

/// Failures writing or reading the preference blob.
///
/// Corrupt content is never an error (the loader falls back to defaults);
/// only I/O problems surface here.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access preference storage at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Failures loading the optional YAML configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
