//! Single-source shortest path over precomputed leg costs.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::time::{Duration, Instant};

use tracing::trace;

use crate::domain::{LegId, LocationId};
use crate::graph::Graph;

use super::cost::{LegCosts, path_cost};

/// How many heap pops between deadline checks.
const DEADLINE_CHECK_INTERVAL: usize = 64;

/// Legs and locations a search must not use.
#[derive(Debug, Clone, Default)]
pub struct Exclusions {
    pub legs: HashSet<LegId>,
    pub locations: HashSet<LocationId>,
}

impl Exclusions {
    pub fn none() -> Self {
        Self::default()
    }
}

/// Point in time after which a search gives up.
#[derive(Debug, Clone, Copy)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    pub fn after(timeout: Duration) -> Self {
        Self(Instant::now().checked_add(timeout))
    }

    pub fn never() -> Self {
        Self(None)
    }

    pub fn expired(&self) -> bool {
        self.0.is_some_and(|at| Instant::now() >= at)
    }
}

/// The deadline passed before the search finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlineExceeded;

/// A path through the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub legs: Vec<LegId>,
    /// `legs.len() + 1` locations, starting at the origin.
    pub locations: Vec<LocationId>,
    /// Sum of the leg costs in path order.
    pub cost: f64,
}

impl Route {
    pub fn hops(&self) -> usize {
        self.legs.len()
    }
}

/// Cheapest path from `from` to `to`.
///
/// Legs with no cost (eliminated) or in `exclusions.legs` are skipped, as
/// are legs entering a location in `exclusions.locations`. Among equal-cost
/// paths the one with fewer legs wins; remaining ties go to the path found
/// first in adjacency order.
///
/// Returns `Ok(None)` when `to` is unreachable.
pub fn shortest_path(
    graph: &Graph,
    costs: &LegCosts,
    from: LocationId,
    to: LocationId,
    exclusions: &Exclusions,
    deadline: &Deadline,
) -> Result<Option<Route>, DeadlineExceeded> {
    let n = graph.location_count();
    let mut best: Vec<Option<(f64, usize)>> = vec![None; n];
    let mut parent: Vec<Option<LegId>> = vec![None; n];
    let mut settled = vec![false; n];
    let mut queue = BinaryHeap::new();

    best[from.0] = Some((0.0, 0));
    queue.push(QueueEntry::new(from, 0.0, 0));

    let mut pops = 0usize;
    while let Some(entry) = queue.pop() {
        pops += 1;
        if pops % DEADLINE_CHECK_INTERVAL == 0 && deadline.expired() {
            return Err(DeadlineExceeded);
        }

        let node = entry.node;
        if settled[node.0] {
            continue;
        }
        settled[node.0] = true;

        if node == to {
            break;
        }

        for &leg_id in graph.outgoing(node) {
            let Some(leg_cost) = costs[leg_id.0] else {
                continue;
            };
            if exclusions.legs.contains(&leg_id) {
                continue;
            }
            let next = graph.leg(leg_id).to();
            if settled[next.0] || exclusions.locations.contains(&next) {
                continue;
            }

            let cost = entry.cost.0 + leg_cost;
            let hops = entry.hops + 1;
            let improves = match best[next.0] {
                None => true,
                Some((c, h)) => cost < c || (cost == c && hops < h),
            };
            if improves {
                best[next.0] = Some((cost, hops));
                parent[next.0] = Some(leg_id);
                queue.push(QueueEntry::new(next, cost, hops));
            }
        }
    }

    if !settled[to.0] {
        trace!(%from, %to, pops, "Destination unreachable");
        return Ok(None);
    }

    let mut legs = Vec::new();
    let mut locations = vec![to];
    let mut current = to;
    while current != from {
        let Some(leg_id) = parent[current.0] else {
            break;
        };
        legs.push(leg_id);
        current = graph.leg(leg_id).from();
        locations.push(current);
    }
    legs.reverse();
    locations.reverse();

    let cost = path_cost(costs, &legs);
    trace!(%from, %to, pops, hops = legs.len(), cost, "Shortest path found");

    Ok(Some(Route {
        legs,
        locations,
        cost,
    }))
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct FloatOrd(pub f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, PartialEq, Eq)]
struct QueueEntry {
    node: LocationId,
    cost: FloatOrd,
    hops: usize,
}

impl QueueEntry {
    fn new(node: LocationId, cost: f64, hops: usize) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            hops,
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the cheapest entry first.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.hops.cmp(&self.hops))
            .then_with(|| other.node.0.cmp(&self.node.0))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
