//! Route response types and their assembly from search results.

use serde::Serialize;

use crate::domain::{CountryCode, LegId, TransportMode};
use crate::graph::Graph;

use super::FilteredGraph;
use super::aggregate::aggregate;
use super::dijkstra::Route;

/// A location along a path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Coordinate {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// One leg of a path, as shown to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeSummary {
    pub from: String,
    pub to: String,
    pub mode: TransportMode,
    pub time: f64,
    pub price: f64,
    pub distance: f64,
}

/// One ranked path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    /// Location names from start to goal.
    pub path: Vec<String>,
    pub coordinates: Vec<Coordinate>,
    pub edges: Vec<EdgeSummary>,
    pub time_sum: f64,
    pub price_sum: f64,
    pub distance_sum: f64,
    #[serde(rename = "CO2_sum")]
    pub co2_sum: f64,
    /// Sum of the legs' weighted costs, including penalty surcharges.
    pub weighted_cost: f64,
    #[serde(skip)]
    pub legs: Vec<LegId>,
}

/// Result of a route request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteResponse {
    pub avoided_countries: Vec<CountryCode>,
    pub penalty_countries: Vec<CountryCode>,
    /// Best first.
    pub paths: Vec<PathResult>,
}

/// Build the response, keeping the search order.
pub fn assemble(filtered: &FilteredGraph<'_>, routes: Vec<Route>) -> RouteResponse {
    let graph = filtered.graph();
    RouteResponse {
        avoided_countries: filtered.avoided_countries().to_vec(),
        penalty_countries: filtered.penalty_countries().to_vec(),
        paths: routes
            .into_iter()
            .map(|route| path_result(graph, route))
            .collect(),
    }
}

fn path_result(graph: &Graph, route: Route) -> PathResult {
    let totals = aggregate(graph, &route.legs);

    let (path, coordinates): (Vec<String>, Vec<Coordinate>) = route
        .locations
        .iter()
        .map(|&id| {
            let location = graph.location(id);
            (
                location.name().to_string(),
                Coordinate {
                    name: location.name().to_string(),
                    latitude: location.latitude(),
                    longitude: location.longitude(),
                },
            )
        })
        .unzip();

    let edges = route
        .legs
        .iter()
        .map(|&id| {
            let leg = graph.leg(id);
            EdgeSummary {
                from: graph.location(leg.from()).name().to_string(),
                to: graph.location(leg.to()).name().to_string(),
                mode: leg.mode(),
                time: leg.time(),
                price: leg.price(),
                distance: leg.distance(),
            }
        })
        .collect();

    PathResult {
        path,
        coordinates,
        edges,
        time_sum: totals.time,
        price_sum: totals.price,
        distance_sum: totals.distance,
        co2_sum: totals.co2,
        weighted_cost: route.cost,
        legs: route.legs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Leg, Location, LocationId, Metrics};
    use crate::planner::{RouteQuery, RouteRequest};
    use crate::regulations::CountryClassifications;

    #[test]
    fn serializes_client_field_names() {
        let de = CountryCode::parse("DE").unwrap();
        let graph = Graph::new(
            vec![
                Location::new("Hamburg", 53.55, 9.99, de).unwrap(),
                Location::new("Munich", 48.14, 11.58, de).unwrap(),
            ],
            vec![
                Leg::new(
                    LocationId(0),
                    LocationId(1),
                    TransportMode::Land,
                    Metrics::new(8.0, 120.0, 780.0, 95.0),
                    de,
                )
                .unwrap(),
            ],
        )
        .unwrap();
        let request =
            RouteRequest::from_query(&RouteQuery::new("Hamburg", "Munich"), 5).unwrap();
        let filtered = FilteredGraph::new(&graph, &request, &CountryClassifications::new());
        let route = Route {
            legs: vec![LegId(0)],
            locations: vec![LocationId(0), LocationId(1)],
            cost: 1.0,
        };

        let response = assemble(&filtered, vec![route]);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["avoided_countries"], serde_json::json!([]));
        let path = &json["paths"][0];
        assert_eq!(path["path"], serde_json::json!(["Hamburg", "Munich"]));
        assert_eq!(path["coordinates"][1]["latitude"], 48.14);
        assert_eq!(path["edges"][0]["mode"], "land");
        assert_eq!(path["edges"][0]["from"], "Hamburg");
        assert_eq!(path["time_sum"], 8.0);
        assert_eq!(path["CO2_sum"], 95.0);
        assert_eq!(path["weighted_cost"], 1.0);
        assert!(path.get("legs").is_none());
    }
}
