//! In-memory transport graph.

use std::collections::HashMap;

use crate::domain::{Leg, LegId, Location, LocationId};

use super::LoadError;

/// Returned by [`Graph::lookup`] when no location has the given name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("location {0:?} not found")]
pub struct LocationNotFound(pub String);

/// Immutable multi-modal transport graph.
///
/// Locations and legs live in index-addressed arenas; the outgoing adjacency
/// is derived once at construction. Nothing can be mutated afterwards, so a
/// `Graph` can be shared behind an `Arc` by any number of concurrent searches.
#[derive(Debug, Clone)]
pub struct Graph {
    locations: Vec<Location>,
    legs: Vec<Leg>,
    outgoing: Vec<Vec<LegId>>,
    by_name: HashMap<String, LocationId>,
    max_time: f64,
    max_price: f64,
}

impl Graph {
    /// Build a graph from validated locations and legs.
    ///
    /// Legs must reference locations by their index in `locations`.
    ///
    /// # Errors
    ///
    /// - [`LoadError::Empty`] if there are no locations
    /// - [`LoadError::DuplicateLocation`] if two locations share a name
    /// - [`LoadError::UndefinedLocation`] if a leg points outside `locations`
    pub fn new(locations: Vec<Location>, legs: Vec<Leg>) -> Result<Self, LoadError> {
        if locations.is_empty() {
            return Err(LoadError::Empty);
        }

        let mut by_name = HashMap::with_capacity(locations.len());
        for (idx, location) in locations.iter().enumerate() {
            if by_name
                .insert(location.name().to_string(), LocationId(idx))
                .is_some()
            {
                return Err(LoadError::DuplicateLocation(location.name().to_string()));
            }
        }

        let mut outgoing = vec![Vec::new(); locations.len()];
        let mut max_time: f64 = 0.0;
        let mut max_price: f64 = 0.0;

        for (idx, leg) in legs.iter().enumerate() {
            for endpoint in [leg.from(), leg.to()] {
                if endpoint.0 >= locations.len() {
                    return Err(LoadError::UndefinedLocation {
                        leg: idx,
                        name: endpoint.to_string(),
                    });
                }
            }
            outgoing[leg.from().0].push(LegId(idx));
            max_time = max_time.max(leg.time());
            max_price = max_price.max(leg.price());
        }

        Ok(Self {
            locations,
            legs,
            outgoing,
            by_name,
            max_time,
            max_price,
        })
    }

    /// Resolve a location name to its id.
    pub fn lookup(&self, name: &str) -> Result<LocationId, LocationNotFound> {
        self.by_name
            .get(name.trim())
            .copied()
            .ok_or_else(|| LocationNotFound(name.to_string()))
    }

    /// Get a location by id.
    ///
    /// Ids are only valid for the graph that issued them; a foreign id panics.
    pub fn location(&self, id: LocationId) -> &Location {
        &self.locations[id.0]
    }

    /// Get a leg by id.
    pub fn leg(&self, id: LegId) -> &Leg {
        &self.legs[id.0]
    }

    /// Legs leaving `id`, in load order.
    pub fn outgoing(&self, id: LocationId) -> &[LegId] {
        &self.outgoing[id.0]
    }

    /// Iterate over all locations with their ids.
    pub fn locations(&self) -> impl Iterator<Item = (LocationId, &Location)> {
        self.locations
            .iter()
            .enumerate()
            .map(|(idx, loc)| (LocationId(idx), loc))
    }

    /// Iterate over all legs with their ids.
    pub fn legs(&self) -> impl Iterator<Item = (LegId, &Leg)> {
        self.legs
            .iter()
            .enumerate()
            .map(|(idx, leg)| (LegId(idx), leg))
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    /// Largest leg time in the graph (hours). Zero for a graph without legs.
    pub fn max_time(&self) -> f64 {
        self.max_time
    }

    /// Largest leg price in the graph. Zero if every leg is free.
    pub fn max_price(&self) -> f64 {
        self.max_price
    }

    /// Case-insensitive name search.
    ///
    /// Prefix matches come first, then other substring matches; each group is
    /// sorted by name. At most `limit` results.
    pub fn search_locations(&self, query: &str, limit: usize) -> Vec<&Location> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut prefix = Vec::new();
        let mut contains = Vec::new();
        for location in &self.locations {
            let name = location.name().to_lowercase();
            if name.starts_with(&needle) {
                prefix.push(location);
            } else if name.contains(&needle) {
                contains.push(location);
            }
        }
        prefix.sort_by(|a, b| a.name().cmp(b.name()));
        contains.sort_by(|a, b| a.name().cmp(b.name()));

        prefix.into_iter().chain(contains).take(limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CountryCode, Metrics, TransportMode};

    fn cc(s: &str) -> CountryCode {
        CountryCode::parse(s).unwrap()
    }

    fn loc(name: &str) -> Location {
        Location::new(name, 10.0, 20.0, cc("DE")).unwrap()
    }

    fn leg(from: usize, to: usize, time: f64, price: f64) -> Leg {
        Leg::new(
            LocationId(from),
            LocationId(to),
            TransportMode::Land,
            Metrics::new(time, price, 10.0, 1.0),
            cc("DE"),
        )
        .unwrap()
    }

    #[test]
    fn builds_adjacency_in_load_order() {
        let graph = Graph::new(
            vec![loc("A"), loc("B"), loc("C")],
            vec![leg(0, 1, 1.0, 1.0), leg(1, 2, 1.0, 1.0), leg(0, 2, 1.0, 1.0)],
        )
        .unwrap();

        assert_eq!(graph.outgoing(LocationId(0)), &[LegId(0), LegId(2)]);
        assert_eq!(graph.outgoing(LocationId(1)), &[LegId(1)]);
        assert!(graph.outgoing(LocationId(2)).is_empty());
        assert_eq!(graph.location_count(), 3);
        assert_eq!(graph.leg_count(), 3);
    }

    #[test]
    fn lookup_by_name() {
        let graph = Graph::new(vec![loc("Hamburg"), loc("Bremen")], vec![]).unwrap();

        assert_eq!(graph.lookup("Bremen").unwrap(), LocationId(1));
        assert_eq!(graph.lookup(" Hamburg ").unwrap(), LocationId(0));
        assert_eq!(
            graph.lookup("Kiel").unwrap_err(),
            LocationNotFound("Kiel".into())
        );
        assert_eq!(graph.location(LocationId(1)).name(), "Bremen");
    }

    #[test]
    fn tracks_maxima() {
        let graph = Graph::new(
            vec![loc("A"), loc("B"), loc("C")],
            vec![leg(0, 1, 2.0, 150.0), leg(1, 2, 5.0, 80.0)],
        )
        .unwrap();

        assert_eq!(graph.max_time(), 5.0);
        assert_eq!(graph.max_price(), 150.0);
    }

    #[test]
    fn empty_graph_rejected() {
        assert!(matches!(Graph::new(vec![], vec![]), Err(LoadError::Empty)));
    }

    #[test]
    fn duplicate_location_rejected() {
        let err = Graph::new(vec![loc("A"), loc("A")], vec![]).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateLocation(name) if name == "A"));
    }

    #[test]
    fn leg_outside_arena_rejected() {
        let err = Graph::new(vec![loc("A"), loc("B")], vec![leg(0, 7, 1.0, 1.0)]).unwrap_err();
        assert!(matches!(err, LoadError::UndefinedLocation { leg: 0, .. }));
    }

    #[test]
    fn search_prefers_prefix_matches() {
        let graph = Graph::new(
            vec![
                loc("Port Said"),
                loc("Shanghai"),
                loc("Portland"),
                loc("Newport"),
            ],
            vec![],
        )
        .unwrap();

        let names: Vec<_> = graph
            .search_locations("port", 10)
            .iter()
            .map(|l| l.name())
            .collect();
        assert_eq!(names, vec!["Port Said", "Portland", "Newport"]);

        assert_eq!(graph.search_locations("PORT", 2).len(), 2);
        assert!(graph.search_locations("  ", 10).is_empty());
        assert!(graph.search_locations("xyz", 10).is_empty());
    }
}
