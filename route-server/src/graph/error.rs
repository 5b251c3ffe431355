//! Graph loading error types.

use std::time::Duration;

use crate::domain::{DomainError, InvalidCountryCode, InvalidTransportMode};

/// Errors that can occur while building or loading a graph.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Reading the graph file failed
    #[error("failed to read graph file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// HTTP request for a remote graph failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote graph source answered with an error status
    #[error("graph source {url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    /// Graph document is not valid JSON or does not match the schema
    #[error("malformed graph document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Graph has no locations at all
    #[error("graph has no locations")]
    Empty,

    /// Two locations share a name
    #[error("duplicate location {0:?}")]
    DuplicateLocation(String),

    /// A leg references a location that was never declared
    #[error("leg {leg} references undefined location {name:?}")]
    UndefinedLocation { leg: usize, name: String },

    /// A location record failed validation
    #[error("invalid location {name:?}: {source}")]
    InvalidLocation {
        name: String,
        #[source]
        source: DomainError,
    },

    /// A leg record failed validation
    #[error("invalid leg {leg}: {source}")]
    InvalidLeg {
        leg: usize,
        #[source]
        source: DomainError,
    },

    /// A country code in the document is not ISO-2
    #[error("{context}: {source}")]
    InvalidCountry {
        context: String,
        #[source]
        source: InvalidCountryCode,
    },

    /// A leg mode is not land, sea or air
    #[error("leg {leg}: {source}")]
    InvalidMode {
        leg: usize,
        #[source]
        source: InvalidTransportMode,
    },

    /// Loading did not finish in time
    #[error("graph load timed out after {0:?}")]
    Timeout(Duration),

    /// The blocking parse task failed
    #[error("graph load task failed: {0}")]
    Task(String),
}
