//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::RouteCache;
use crate::graph::GraphStore;
use crate::planner::EngineConfig;
use crate::regulations::CargoRegulations;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Current graph, refreshed in the background
    pub graph: GraphStore,

    /// Route engine configuration
    pub engine: Arc<EngineConfig>,

    /// Cargo regulation table, if configured
    pub regulations: Option<Arc<CargoRegulations>>,

    /// Computed route responses
    pub cache: RouteCache,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        graph: GraphStore,
        engine: EngineConfig,
        regulations: Option<CargoRegulations>,
        cache: RouteCache,
    ) -> Self {
        Self {
            graph,
            engine: Arc::new(engine),
            regulations: regulations.map(Arc::new),
            cache,
        }
    }
}
