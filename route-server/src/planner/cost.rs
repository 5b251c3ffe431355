//! Weighted leg cost.

use crate::domain::{Leg, LegId};
use crate::graph::Graph;

use super::{FilteredGraph, Weights};

/// Per-leg search cost, indexed by [`LegId`]; `None` for eliminated legs.
pub type LegCosts = Vec<Option<f64>>;

/// Combines a leg's time and price into one non-negative cost.
///
/// `cost = w_t * time / max_time + w_p * price / max_price`, plus the
/// penalty surcharge for penalized legs. The maxima are the graph-wide leg
/// maxima, so each term lies in [0, 1]; a zero maximum contributes 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostFunction {
    weights: Weights,
    max_time: f64,
    max_price: f64,
    surcharge: f64,
}

impl CostFunction {
    pub fn new(weights: Weights, graph: &Graph, surcharge: f64) -> Self {
        Self {
            weights,
            max_time: graph.max_time(),
            max_price: graph.max_price(),
            surcharge,
        }
    }

    /// Cost of one leg, with the surcharge if `penalized`.
    pub fn leg_cost(&self, leg: &Leg, penalized: bool) -> f64 {
        let time = normalized(leg.time(), self.max_time);
        let price = normalized(leg.price(), self.max_price);
        let base = self.weights.time() * time + self.weights.price() * price;
        if penalized { base + self.surcharge } else { base }
    }

    /// Costs for every leg of the filtered graph.
    pub fn leg_costs(&self, filtered: &FilteredGraph<'_>) -> LegCosts {
        filtered
            .graph()
            .legs()
            .map(|(id, leg)| {
                filtered
                    .is_admissible(id)
                    .then(|| self.leg_cost(leg, filtered.is_penalized(id)))
            })
            .collect()
    }
}

fn normalized(value: f64, max: f64) -> f64 {
    if max > 0.0 { value / max } else { 0.0 }
}

/// Sum of leg costs in path order.
///
/// Eliminated legs count as infinitely expensive.
pub(crate) fn path_cost(costs: &LegCosts, legs: &[LegId]) -> f64 {
    legs.iter()
        .map(|id| costs[id.0].unwrap_or(f64::INFINITY))
        .sum()
}
