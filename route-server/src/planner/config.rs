//! Engine configuration for the route planner.

use std::time::Duration;

/// Default surcharge added to a penalized leg's weighted cost.
///
/// A normalized leg cost is at most 1.0 (the graph's slowest and most
/// expensive leg), so the default makes one penalized leg as costly as the
/// worst unpenalized leg in the graph.
pub const DEFAULT_PENALTY_SURCHARGE: f64 = 1.0;

/// Configuration parameters for route search.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Cost added once per penalized (soft-avoided) leg.
    pub penalty_surcharge: f64,

    /// Upper bound for a request's `top_n`.
    pub max_top_n: usize,

    /// Per-request search deadline (milliseconds).
    pub search_timeout_ms: u64,
}

impl EngineConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(penalty_surcharge: f64, max_top_n: usize, search_timeout_ms: u64) -> Self {
        Self {
            penalty_surcharge,
            max_top_n,
            search_timeout_ms,
        }
    }

    /// Returns the search deadline as a Duration.
    pub fn search_timeout(&self) -> Duration {
        Duration::from_millis(self.search_timeout_ms)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            penalty_surcharge: DEFAULT_PENALTY_SURCHARGE,
            max_top_n: 5,
            search_timeout_ms: 5_000,
        }
    }
}
