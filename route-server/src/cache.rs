//! Caching layer for route responses.
//!
//! Entries are keyed by the graph generation they were computed on and the
//! canonical form of the validated request, so a graph reload makes every
//! older entry unreachable. Only successful responses are cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::planner::{RouteRequest, RouteResponse};

/// Cache key: (graph generation, canonical request).
type RouteKey = (u64, String);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_capacity: 1000,
        }
    }
}

/// Cache of computed route responses.
#[derive(Clone)]
pub struct RouteCache {
    routes: MokaCache<RouteKey, Arc<RouteResponse>>,
}

impl RouteCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let routes = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { routes }
    }

    fn key(generation: u64, request: &RouteRequest) -> RouteKey {
        (generation, request.cache_key())
    }

    pub async fn get(&self, generation: u64, request: &RouteRequest) -> Option<Arc<RouteResponse>> {
        self.routes.get(&Self::key(generation, request)).await
    }

    pub async fn insert(&self, generation: u64, request: &RouteRequest, response: Arc<RouteResponse>) {
        self.routes
            .insert(Self::key(generation, request), response)
            .await;
    }

    /// Approximate number of cached responses, as reported by `/health`.
    pub fn entry_count(&self) -> u64 {
        self.routes.entry_count()
    }
}
