//! Error types for graph exploration and query synthesis

use std::time::Duration;
use thiserror::Error;

/// Errors raised by the catalog, the query executor and the explorer
#[derive(Error, Debug)]
pub enum ExploreError {
    /// No endpoint with this name in the catalog
    #[error("Unknown endpoint: {0}")]
    UnknownEndpoint(String),

    /// No named query with this name in the catalog
    #[error("Unknown query: {0}")]
    UnknownQuery(String),

    /// Prefix not registered for the endpoint
    #[error("Prefix '{prefix}' not found in endpoint '{endpoint}'")]
    UnknownPrefix {
        prefix: String,
        endpoint: String,
    },

    /// A template placeholder has no binding
    #[error("Missing parameter: {name}")]
    MissingParameter {
        name: String,
    },

    /// Network, HTTP status or decoding failure of a remote endpoint
    #[error("Endpoint error ({endpoint}): {cause}")]
    Endpoint {
        endpoint: String,
        cause: String,
    },

    /// A remote call was abandoned after the given timeout
    #[error("Endpoint error ({endpoint}): no response after {after:?}")]
    Timeout {
        endpoint: String,
        after: Duration,
    },

    /// A caller expected rows but got none
    #[error("Empty result: {0}")]
    EmptyResult(String),

    /// Catalog loading or parsing error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExploreError {
    pub(crate) fn endpoint(endpoint: &str, cause: impl ToString) -> Self {
        ExploreError::Endpoint {
            endpoint: endpoint.to_string(),
            cause: cause.to_string(),
        }
    }

    /// Whether this error came from the remote side rather than local configuration
    pub fn is_remote(&self) -> bool {
        matches!(self, ExploreError::Endpoint { .. } | ExploreError::Timeout { .. })
    }
}

impl From<serde_yaml::Error> for ExploreError {
    fn from(e: serde_yaml::Error) -> Self {
        ExploreError::Config(e.to_string())
    }
}

pub type ExploreResult<T> = Result<T, ExploreError>;
