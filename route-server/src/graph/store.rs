//! Shared, refreshable graph holder.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::{Graph, GraphSource, LoadError};

/// One loaded version of the graph.
///
/// Cloning is cheap; searches hold a snapshot for their whole run so a
/// concurrent reload never changes the graph under them.
#[derive(Debug, Clone)]
pub struct GraphSnapshot {
    pub graph: Arc<Graph>,
    /// Incremented on every successful (re)load, starting at 1.
    pub generation: u64,
    pub loaded_at: DateTime<Utc>,
}

/// Thread-safe holder of the current graph with support for background refresh.
///
/// A failed refresh leaves the previous graph in place.
#[derive(Clone)]
pub struct GraphStore {
    inner: Arc<RwLock<GraphSnapshot>>,
    source: GraphSource,
    http: reqwest::Client,
    load_timeout: Duration,
}

impl GraphStore {
    /// Load the graph for the first time.
    ///
    /// Fails if the source cannot be loaded within `load_timeout`; callers
    /// treat this as fatal since there is no previous graph to fall back to.
    pub async fn load(source: GraphSource, load_timeout: Duration) -> Result<Self, LoadError> {
        let http = reqwest::Client::builder().timeout(load_timeout).build()?;
        let graph = load_with_timeout(&source, &http, load_timeout).await?;

        info!(
            source = %source,
            locations = graph.location_count(),
            legs = graph.leg_count(),
            "Loaded graph"
        );

        Ok(Self::with_snapshot(graph, 1, source, http, load_timeout))
    }

    /// Wrap an already-built graph.
    ///
    /// `source` is only used by later refreshes.
    pub fn from_graph(graph: Graph, source: GraphSource, load_timeout: Duration) -> Self {
        Self::with_snapshot(graph, 1, source, reqwest::Client::new(), load_timeout)
    }

    fn with_snapshot(
        graph: Graph,
        generation: u64,
        source: GraphSource,
        http: reqwest::Client,
        load_timeout: Duration,
    ) -> Self {
        let snapshot = GraphSnapshot {
            graph: Arc::new(graph),
            generation,
            loaded_at: Utc::now(),
        };
        Self {
            inner: Arc::new(RwLock::new(snapshot)),
            source,
            http,
            load_timeout,
        }
    }

    /// The graph currently being served.
    pub async fn current(&self) -> GraphSnapshot {
        self.inner.read().await.clone()
    }

    /// Reload the graph from its source.
    ///
    /// On success, replaces the current graph and returns the new snapshot.
    /// On failure (including timeout), the existing graph is preserved and
    /// the error is returned.
    pub async fn refresh(&self) -> Result<GraphSnapshot, LoadError> {
        let graph = match load_with_timeout(&self.source, &self.http, self.load_timeout).await {
            Ok(graph) => graph,
            Err(e) => {
                warn!(source = %self.source, error = %e, "Graph refresh failed, keeping previous graph");
                return Err(e);
            }
        };

        let mut guard = self.inner.write().await;
        let generation = guard.generation + 1;
        *guard = GraphSnapshot {
            graph: Arc::new(graph),
            generation,
            loaded_at: Utc::now(),
        };

        info!(
            generation = guard.generation,
            locations = guard.graph.location_count(),
            legs = guard.graph.leg_count(),
            "Refreshed graph"
        );

        Ok(guard.clone())
    }
}

async fn load_with_timeout(
    source: &GraphSource,
    http: &reqwest::Client,
    timeout: Duration,
) -> Result<Graph, LoadError> {
    tokio::time::timeout(timeout, source.load(http))
        .await
        .map_err(|_| LoadError::Timeout(timeout))?
}
