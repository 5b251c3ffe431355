//! Route engine error types.

use std::time::Duration;

/// Everything `compute_paths` can fail with.
///
/// `Validation` and `UnknownLocation` are raised before any search work
/// starts. `NoRouteFound` and `Timeout` end a single request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// A request field is malformed or out of range
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Start or goal is not a location in the graph
    #[error("unknown {field} location {name:?}")]
    UnknownLocation { field: &'static str, name: String },

    /// Constraints or connectivity leave no admissible path
    #[error("no route found from {start} to {goal}")]
    NoRouteFound { start: String, goal: String },

    /// Search exceeded its deadline
    #[error("search exceeded its deadline of {0:?}")]
    Timeout(Duration),
}

impl EngineError {
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field,
            message: message.into(),
        }
    }
}
