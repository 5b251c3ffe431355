//! K-best loopless path search (Yen's algorithm).
//!
//! The first path is a plain shortest path. Each further path deviates from
//! an already accepted one: for every prefix of the last accepted path, the
//! next leg of each accepted path sharing that prefix is excluded along with
//! the prefix's locations, and the remainder is re-solved from the prefix's
//! last location. Deviations are kept in a candidate queue and the cheapest
//! unseen one is accepted next.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use tracing::{debug, trace};

use crate::domain::{LegId, LocationId};
use crate::graph::Graph;

use super::cost::{LegCosts, path_cost};
use super::dijkstra::{Deadline, DeadlineExceeded, Exclusions, FloatOrd, Route, shortest_path};

/// Error from path search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Goal is unreachable from start over admissible legs
    #[error("no route found")]
    NoRoute,

    /// Search ran past its deadline
    #[error("search timed out")]
    Timeout,
}

impl From<DeadlineExceeded> for SearchError {
    fn from(_: DeadlineExceeded) -> Self {
        SearchError::Timeout
    }
}

/// Up to `k` cheapest simple paths from `start` to `goal`, best first.
///
/// Paths come in non-decreasing cost order; equal costs are ordered by
/// fewer legs, then by discovery order. No two paths share an edge
/// sequence. Fewer than `k` paths is not an error.
pub fn k_best_paths(
    graph: &Graph,
    costs: &LegCosts,
    start: LocationId,
    goal: LocationId,
    k: usize,
    deadline: &Deadline,
) -> Result<Vec<Route>, SearchError> {
    let first = shortest_path(graph, costs, start, goal, &Exclusions::none(), deadline)?
        .ok_or(SearchError::NoRoute)?;

    let mut seen: HashSet<Vec<LegId>> = HashSet::new();
    seen.insert(first.legs.clone());
    let mut accepted = vec![first];
    let mut candidates = BinaryHeap::new();
    let mut discovered = 0usize;

    while accepted.len() < k {
        let last = accepted[accepted.len() - 1].clone();

        for i in 0..last.legs.len() {
            if deadline.expired() {
                return Err(SearchError::Timeout);
            }

            let spur = last.locations[i];
            let root_legs = &last.legs[..i];
            let root_locations = &last.locations[..i];

            let mut exclusions = Exclusions::none();
            for path in &accepted {
                if path.legs.len() > i && path.legs[..i] == *root_legs {
                    exclusions.legs.insert(path.legs[i]);
                }
            }
            exclusions.locations.extend(root_locations.iter().copied());

            let Some(spur_route) = shortest_path(graph, costs, spur, goal, &exclusions, deadline)?
            else {
                continue;
            };

            let mut legs = root_legs.to_vec();
            legs.extend_from_slice(&spur_route.legs);
            if !seen.insert(legs.clone()) {
                continue;
            }

            let mut locations = root_locations.to_vec();
            locations.extend_from_slice(&spur_route.locations);
            let cost = path_cost(costs, &legs);

            trace!(spur = %spur, hops = legs.len(), cost, "Candidate path");
            candidates.push(Candidate {
                cost: FloatOrd(cost),
                hops: legs.len(),
                seq: discovered,
                route: Route {
                    legs,
                    locations,
                    cost,
                },
            });
            discovered += 1;
        }

        match candidates.pop() {
            Some(candidate) => accepted.push(candidate.route),
            None => break,
        }
    }

    debug!(
        %start,
        %goal,
        requested = k,
        found = accepted.len(),
        candidates = discovered,
        "K-best search complete"
    );

    Ok(accepted)
}

#[derive(Debug)]
struct Candidate {
    cost: FloatOrd,
    hops: usize,
    seq: usize,
    route: Route,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the best candidate first.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.hops.cmp(&self.hops))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CountryCode, Leg, Location, Metrics, TransportMode};
    use std::time::Duration;

    fn graph(n: usize, edges: &[(usize, usize)]) -> Graph {
        let de = CountryCode::parse("DE").unwrap();
        let locations = (0..n)
            .map(|i| Location::new(format!("L{i}"), 0.0, 0.0, de).unwrap())
            .collect();
        let legs = edges
            .iter()
            .map(|&(a, b)| {
                Leg::new(
                    LocationId(a),
                    LocationId(b),
                    TransportMode::Land,
                    Metrics::new(1.0, 1.0, 1.0, 0.0),
                    de,
                )
                .unwrap()
            })
            .collect();
        Graph::new(locations, legs).unwrap()
    }

    fn search(graph: &Graph, costs: &LegCosts, k: usize) -> Result<Vec<Route>, SearchError> {
        let goal = LocationId(graph.location_count() - 1);
        k_best_paths(graph, costs, LocationId(0), goal, k, &Deadline::never())
    }

    fn leg_ids(route: &Route) -> Vec<usize> {
        route.legs.iter().map(|l| l.0).collect()
    }

    // Classic Yen example shape:
    //   0 -> 1 (3), 0 -> 2 (2), 1 -> 3 (4), 2 -> 1 (1), 2 -> 3 (2),
    //   2 -> 4 (3), 3 -> 4 (2), 3 -> 5 (1), 4 -> 5 (2)
    fn yen_graph() -> (Graph, LegCosts) {
        let g = graph(
            6,
            &[
                (0, 1),
                (0, 2),
                (1, 3),
                (2, 1),
                (2, 3),
                (2, 4),
                (3, 4),
                (3, 5),
                (4, 5),
            ],
        );
        let costs = [3.0, 2.0, 4.0, 1.0, 2.0, 3.0, 2.0, 1.0, 2.0]
            .into_iter()
            .map(Some)
            .collect();
        (g, costs)
    }

    #[test]
    fn finds_k_paths_in_cost_order() {
        let (g, costs) = yen_graph();
        let routes = search(&g, &costs, 3).unwrap();

        assert_eq!(routes.len(), 3);
        // 0-2-3-5 (5), 0-2-4-5 (7), then 0-1-3-5 and 0-2-1-3-5 both cost 8;
        // the shorter one wins the tie.
        assert_eq!(leg_ids(&routes[0]), vec![1, 4, 7]);
        assert_eq!(routes[0].cost, 5.0);
        assert_eq!(leg_ids(&routes[1]), vec![1, 5, 8]);
        assert_eq!(routes[1].cost, 7.0);
        assert_eq!(leg_ids(&routes[2]), vec![0, 2, 7]);
        assert_eq!(routes[2].cost, 8.0);
    }

    #[test]
    fn returns_fewer_when_graph_runs_out() {
        let g = graph(3, &[(0, 1), (1, 2), (0, 2)]);
        let costs = vec![Some(1.0), Some(1.0), Some(1.0)];
        let routes = search(&g, &costs, 5).unwrap();

        assert_eq!(routes.len(), 2);
        assert_eq!(leg_ids(&routes[0]), vec![2]);
        assert_eq!(leg_ids(&routes[1]), vec![0, 1]);
    }

    #[test]
    fn parallel_legs_are_distinct_paths() {
        let g = graph(2, &[(0, 1), (0, 1)]);
        let costs = vec![Some(2.0), Some(1.0)];
        let routes = search(&g, &costs, 3).unwrap();

        assert_eq!(routes.len(), 2);
        assert_eq!(leg_ids(&routes[0]), vec![1]);
        assert_eq!(leg_ids(&routes[1]), vec![0]);
    }

    #[test]
    fn paths_are_loopless() {
        // A cycle 1 <-> 2 must never be traversed.
        let g = graph(4, &[(0, 1), (1, 2), (2, 1), (2, 3), (1, 3)]);
        let costs = vec![Some(1.0); 5];
        let routes = search(&g, &costs, 5).unwrap();

        for route in &routes {
            let unique: HashSet<_> = route.locations.iter().collect();
            assert_eq!(unique.len(), route.locations.len());
        }
        assert_eq!(routes.len(), 2);
    }

    #[test]
    fn unreachable_goal_is_no_route() {
        let g = graph(3, &[(0, 1)]);
        let costs = vec![Some(1.0)];
        assert_eq!(search(&g, &costs, 3), Err(SearchError::NoRoute));
    }

    #[test]
    fn eliminated_legs_never_used() {
        let g = graph(3, &[(0, 1), (1, 2), (0, 2)]);
        let costs = vec![Some(1.0), Some(1.0), None];
        let routes = search(&g, &costs, 3).unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(leg_ids(&routes[0]), vec![0, 1]);
    }

    #[test]
    fn expired_deadline_is_timeout() {
        // Layered graph with many alternatives.
        let mut edges = Vec::new();
        let width = 10;
        let layers = 8;
        for layer in 0..layers {
            for a in 0..width {
                for b in 0..width {
                    edges.push((1 + layer * width + a, 1 + (layer + 1) * width + b));
                }
            }
        }
        for a in 0..width {
            edges.push((0, 1 + a));
        }
        let goal = 1 + (layers + 1) * width;
        for a in 0..width {
            edges.push((1 + layers * width + a, goal));
        }
        let g = graph(goal + 1, &edges);
        let costs = vec![Some(1.0); edges.len()];

        let result = k_best_paths(
            &g,
            &costs,
            LocationId(0),
            LocationId(goal),
            5,
            &Deadline::after(Duration::ZERO),
        );
        assert_eq!(result, Err(SearchError::Timeout));
    }
}
