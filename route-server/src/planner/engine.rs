//! The route engine entry point.

use tracing::debug;

use crate::graph::Graph;
use crate::regulations::{CargoRegulations, CountryClassifications};

use super::cost::CostFunction;
use super::dijkstra::Deadline;
use super::response::assemble;
use super::search::{SearchError, k_best_paths};
use super::{EngineConfig, EngineError, FilteredGraph, RouteQuery, RouteRequest, RouteResponse};

/// Computes ranked routes over one graph snapshot.
///
/// Borrowing everything it needs, a `Planner` is cheap to build per request
/// and carries no mutable state.
pub struct Planner<'a> {
    graph: &'a Graph,
    config: &'a EngineConfig,
    regulations: Option<&'a CargoRegulations>,
}

impl<'a> Planner<'a> {
    pub fn new(graph: &'a Graph, config: &'a EngineConfig) -> Self {
        Self {
            graph,
            config,
            regulations: None,
        }
    }

    /// Use a cargo regulation table for requests carrying a description.
    pub fn with_regulations(mut self, regulations: Option<&'a CargoRegulations>) -> Self {
        self.regulations = regulations;
        self
    }

    /// Validate a client query and plan it.
    pub fn compute_paths(&self, query: &RouteQuery) -> Result<RouteResponse, EngineError> {
        let request = RouteRequest::from_query(query, self.config.max_top_n)?;
        self.plan(&request)
    }

    /// Plan an already-validated request.
    ///
    /// # Errors
    ///
    /// - [`EngineError::UnknownLocation`] if start or goal is not in the graph
    /// - [`EngineError::NoRouteFound`] if no admissible path exists
    /// - [`EngineError::Timeout`] if the search deadline passes
    pub fn plan(&self, request: &RouteRequest) -> Result<RouteResponse, EngineError> {
        let start = self
            .graph
            .lookup(&request.start)
            .map_err(|e| EngineError::UnknownLocation {
                field: "start",
                name: e.0,
            })?;
        let goal = self
            .graph
            .lookup(&request.goal)
            .map_err(|e| EngineError::UnknownLocation {
                field: "goal",
                name: e.0,
            })?;

        let cargo = match (self.regulations, request.description.as_deref()) {
            (Some(regulations), Some(description)) => regulations.classify(description),
            _ => CountryClassifications::new(),
        };

        let filtered = FilteredGraph::new(self.graph, request, &cargo);
        let costs = CostFunction::new(request.weights, self.graph, self.config.penalty_surcharge)
            .leg_costs(&filtered);

        let timeout = self.config.search_timeout();
        let deadline = Deadline::after(timeout);
        let routes = k_best_paths(self.graph, &costs, start, goal, request.top_n, &deadline)
            .map_err(|e| match e {
                SearchError::NoRoute => EngineError::NoRouteFound {
                    start: request.start.clone(),
                    goal: request.goal.clone(),
                },
                SearchError::Timeout => EngineError::Timeout(timeout),
            })?;

        debug!(
            start = %request.start,
            goal = %request.goal,
            cargo_countries = cargo.len(),
            paths = routes.len(),
            "Planned routes"
        );

        Ok(assemble(&filtered, routes))
    }
}
