//! Constraint filter: one verdict per leg for a given request.

use std::collections::BTreeSet;

use tracing::debug;

use crate::domain::{Classification, CountryCode, LegId};
use crate::graph::Graph;
use crate::regulations::CountryClassifications;

use super::policy::{Verdict, decide};
use super::{Flag, RouteRequest};

/// A request-scoped view of the graph.
///
/// Holds a verdict per leg but never copies legs; the graph stays shared.
#[derive(Debug, Clone)]
pub struct FilteredGraph<'g> {
    graph: &'g Graph,
    verdicts: Vec<Verdict>,
    avoided_countries: Vec<CountryCode>,
    penalty_countries: Vec<CountryCode>,
}

impl<'g> FilteredGraph<'g> {
    /// Apply the request's constraints to every leg.
    ///
    /// `cargo` holds per-country classifications derived from the cargo
    /// description; a leg's classification in a country is the stronger of
    /// its own and the cargo's.
    pub fn new(graph: &'g Graph, request: &RouteRequest, cargo: &CountryClassifications) -> Self {
        // Countries whose own verdict eliminated or penalized some leg
        let mut eliminating = BTreeSet::new();
        let mut penalizing = BTreeSet::new();
        // Countries carried by a leg that stays in the graph, and by one that
        // stays without a surcharge
        let mut admitted = BTreeSet::new();
        let mut unpenalized = BTreeSet::new();

        let verdicts: Vec<Verdict> = graph
            .legs()
            .map(|(_, leg)| {
                if !request.allowed_modes.contains(&leg.mode()) {
                    return Verdict::Eliminate;
                }

                let mut worst = Verdict::Admit;
                for &country in leg.countries() {
                    let class = leg.classification().max(cargo.get(&country).copied());
                    let verdict = decide(
                        class,
                        flag_for(class, request),
                        request.avoid_countries.contains(&country),
                    );
                    match verdict {
                        Verdict::Eliminate => {
                            eliminating.insert(country);
                        }
                        Verdict::Penalize => {
                            penalizing.insert(country);
                        }
                        Verdict::Admit => {}
                    }
                    worst = worst.max(verdict);
                }

                match worst {
                    Verdict::Admit => {
                        admitted.extend(leg.countries().iter().copied());
                        unpenalized.extend(leg.countries().iter().copied());
                    }
                    Verdict::Penalize => admitted.extend(leg.countries().iter().copied()),
                    Verdict::Eliminate => {}
                }
                worst
            })
            .collect();

        // A country is avoided only if no admitted leg still enters it, and
        // penalized only if some admitted leg enters it and every such leg
        // carries a surcharge. Avoid-list members absent from the graph are
        // still reported as avoided.
        let avoided: BTreeSet<CountryCode> = eliminating
            .iter()
            .chain(&request.avoid_countries)
            .filter(|c| !admitted.contains(*c))
            .copied()
            .collect();
        let penalty: Vec<CountryCode> = penalizing
            .iter()
            .filter(|c| admitted.contains(*c) && !unpenalized.contains(*c))
            .copied()
            .collect();

        debug!(
            eliminated = verdicts.iter().filter(|v| **v == Verdict::Eliminate).count(),
            penalized = verdicts.iter().filter(|v| **v == Verdict::Penalize).count(),
            legs = verdicts.len(),
            "Applied constraints"
        );

        Self {
            graph,
            verdicts,
            avoided_countries: avoided.into_iter().collect(),
            penalty_countries: penalty,
        }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    pub fn verdict(&self, leg: LegId) -> Verdict {
        self.verdicts[leg.0]
    }

    pub fn is_admissible(&self, leg: LegId) -> bool {
        self.verdict(leg) != Verdict::Eliminate
    }

    pub fn is_penalized(&self, leg: LegId) -> bool {
        self.verdict(leg) == Verdict::Penalize
    }

    /// Sorted.
    pub fn avoided_countries(&self) -> &[CountryCode] {
        &self.avoided_countries
    }

    /// Sorted; disjoint from [`FilteredGraph::avoided_countries`].
    pub fn penalty_countries(&self) -> &[CountryCode] {
        &self.penalty_countries
    }
}

fn flag_for(class: Option<Classification>, request: &RouteRequest) -> Flag {
    match class {
        Some(Classification::Prohibited) => request.prohibited_flag,
        Some(Classification::Restricted) => request.restricted_flag,
        None => Flag::Ignore,
    }
}
