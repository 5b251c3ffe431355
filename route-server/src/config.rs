//! Server configuration from environment variables.
//!
//! # Environment Variables
//!
//! - `ROUTE_GRAPH_SOURCE`: graph document path or `http(s)://` URL (required)
//! - `ROUTE_REGULATIONS_PATH`: cargo regulations JSON (optional)
//! - `ROUTE_BIND_ADDR`: listen address (default `127.0.0.1:8000`)
//! - `ROUTE_RELOAD_INTERVAL_SECS`: graph reload period, 0 disables (default 3600)
//! - `ROUTE_RELOAD_TIMEOUT_SECS`: limit for one graph load (default 30)
//! - `ROUTE_SEARCH_TIMEOUT_MS`: per-request search deadline (default 5000)
//! - `ROUTE_PENALTY_SURCHARGE`: cost added per penalized leg (default 1.0)
//! - `ROUTE_CACHE_TTL_SECS`: response cache TTL (default 300)
//! - `ROUTE_CACHE_CAPACITY`: response cache size (default 1000)

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::graph::GraphSource;
use crate::planner::{DEFAULT_PENALTY_SURCHARGE, EngineConfig};

/// Error reading configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A required variable is unset or empty
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable could not be parsed
    #[error("invalid {var}={value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub graph_source: GraphSource,
    pub regulations_path: Option<PathBuf>,
    pub bind_addr: SocketAddr,
    /// `None` disables periodic reloads.
    pub reload_interval: Option<Duration>,
    pub reload_timeout: Duration,
    pub engine: EngineConfig,
    pub cache: CacheConfig,
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let graph_source = get("ROUTE_GRAPH_SOURCE")
            .map(|s| GraphSource::parse(s.trim()))
            .ok_or(ConfigError::Missing("ROUTE_GRAPH_SOURCE"))?;
        let regulations_path = get("ROUTE_REGULATIONS_PATH").map(|s| PathBuf::from(s.trim()));

        let bind_addr = parse_or(&get, "ROUTE_BIND_ADDR", SocketAddr::from(([127, 0, 0, 1], 8000)))?;

        let reload_secs: u64 = parse_or(&get, "ROUTE_RELOAD_INTERVAL_SECS", 3600)?;
        let reload_timeout_secs: u64 = parse_or(&get, "ROUTE_RELOAD_TIMEOUT_SECS", 30)?;
        if reload_timeout_secs == 0 {
            return Err(invalid("ROUTE_RELOAD_TIMEOUT_SECS", "0", "must be positive"));
        }

        let defaults = EngineConfig::default();
        let search_timeout_ms: u64 =
            parse_or(&get, "ROUTE_SEARCH_TIMEOUT_MS", defaults.search_timeout_ms)?;
        if search_timeout_ms == 0 {
            return Err(invalid("ROUTE_SEARCH_TIMEOUT_MS", "0", "must be positive"));
        }
        let penalty_surcharge: f64 =
            parse_or(&get, "ROUTE_PENALTY_SURCHARGE", DEFAULT_PENALTY_SURCHARGE)?;
        if !penalty_surcharge.is_finite() || penalty_surcharge < 0.0 {
            return Err(invalid(
                "ROUTE_PENALTY_SURCHARGE",
                &penalty_surcharge.to_string(),
                "must be a non-negative number",
            ));
        }

        let cache_defaults = CacheConfig::default();
        let cache_ttl_secs: u64 =
            parse_or(&get, "ROUTE_CACHE_TTL_SECS", cache_defaults.ttl.as_secs())?;
        let cache_capacity: u64 =
            parse_or(&get, "ROUTE_CACHE_CAPACITY", cache_defaults.max_capacity)?;

        Ok(Self {
            graph_source,
            regulations_path,
            bind_addr,
            reload_interval: (reload_secs > 0).then(|| Duration::from_secs(reload_secs)),
            reload_timeout: Duration::from_secs(reload_timeout_secs),
            engine: EngineConfig::new(penalty_surcharge, defaults.max_top_n, search_timeout_ms),
            cache: CacheConfig {
                ttl: Duration::from_secs(cache_ttl_secs),
                max_capacity: cache_capacity,
            },
        })
    }
}

fn parse_or<T>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(var) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(var, &value, &e.to_string())),
    }
}

fn invalid(var: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
