//! Constraint-aware route planning.
//!
//! A request is validated, every leg of the graph gets a verdict from the
//! constraint policy (admit, penalize or eliminate), admitted legs get a
//! weighted cost, and Yen's algorithm returns the `top_n` cheapest loopless
//! paths. Totals and country reports are attached by the response assembler.

mod aggregate;
mod config;
mod cost;
mod dijkstra;
mod engine;
mod error;
mod filter;
mod policy;
mod request;
mod response;
mod search;


pub use aggregate::aggregate;
pub use config::{DEFAULT_PENALTY_SURCHARGE, EngineConfig};
pub use cost::{CostFunction, LegCosts};
pub use dijkstra::{Deadline, DeadlineExceeded, Exclusions, Route, shortest_path};
pub use engine::Planner;
pub use error::EngineError;
pub use filter::FilteredGraph;
pub use policy::{Verdict, decide};
pub use request::{Flag, RouteQuery, RouteRequest, Weights};
pub use response::{Coordinate, EdgeSummary, PathResult, RouteResponse, assemble};
pub use search::{SearchError, k_best_paths};
