use crate::domain::{LegId, Metrics};
use crate::graph::Graph;

/// Totals of time, price, distance and CO2 over a path's legs.
pub fn aggregate(graph: &Graph, legs: &[LegId]) -> Metrics {
    legs.iter()
        .fold(Metrics::default(), |total, &id| total.plus(graph.leg(id).metrics()))
}
