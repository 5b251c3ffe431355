//! Cargo regulation table errors.

use crate::domain::InvalidCountryCode;

/// Errors that can occur when loading the cargo regulation table.
#[derive(Debug, thiserror::Error)]
pub enum RegulationError {
    /// Reading the table file failed
    #[error("failed to read regulations file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Table is not valid JSON or does not match the schema
    #[error("malformed regulations table: {0}")]
    Malformed(#[from] serde_json::Error),

    /// An item lists a country code that is not ISO-2
    #[error("item {item:?}: {source}")]
    InvalidCountry {
        item: String,
        #[source]
        source: InvalidCountryCode,
    },
}
