//! Graph documents and where they are loaded from.
//!
//! A graph document is JSON with a `locations` array and a `legs` array.
//! Legs name their endpoints by location name; `bidirectional` legs are
//! expanded into one leg per direction.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::debug;

use crate::domain::{Classification, CountryCode, Leg, Location, LocationId, Metrics, TransportMode};

use super::{Graph, LoadError};

/// A location as written in a graph document.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationRecord {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
}

/// A leg as written in a graph document.
#[derive(Debug, Clone, Deserialize)]
pub struct LegRecord {
    pub from: String,
    pub to: String,
    pub mode: String,
    pub time: f64,
    pub price: f64,
    pub distance: f64,
    #[serde(default, alias = "CO2")]
    pub co2: f64,
    /// Countries crossed besides the destination's.
    #[serde(default)]
    pub transit_countries: Vec<String>,
    #[serde(default)]
    pub classification: Option<Classification>,
    /// Also add the reverse leg with the same costs.
    #[serde(default)]
    pub bidirectional: bool,
}

/// Top-level graph document.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphDocument {
    pub locations: Vec<LocationRecord>,
    #[serde(default)]
    pub legs: Vec<LegRecord>,
}

impl GraphDocument {
    /// Validate every record and build the graph.
    pub fn into_graph(self) -> Result<Graph, LoadError> {
        let mut locations = Vec::with_capacity(self.locations.len());
        let mut ids: HashMap<String, LocationId> = HashMap::with_capacity(self.locations.len());

        for record in self.locations {
            let country =
                CountryCode::parse_normalized(&record.country).map_err(|source| {
                    LoadError::InvalidCountry {
                        context: format!("location {:?}", record.name),
                        source,
                    }
                })?;
            let location = Location::new(&record.name, record.latitude, record.longitude, country)
                .map_err(|source| LoadError::InvalidLocation {
                    name: record.name.clone(),
                    source,
                })?;

            let id = LocationId(locations.len());
            if ids.insert(location.name().to_string(), id).is_some() {
                return Err(LoadError::DuplicateLocation(location.name().to_string()));
            }
            locations.push(location);
        }

        let mut legs = Vec::with_capacity(self.legs.len());
        for (idx, record) in self.legs.into_iter().enumerate() {
            let resolve = |name: &str| {
                ids.get(name.trim())
                    .copied()
                    .ok_or_else(|| LoadError::UndefinedLocation {
                        leg: idx,
                        name: name.to_string(),
                    })
            };
            let from = resolve(&record.from)?;
            let to = resolve(&record.to)?;

            let mode: TransportMode = record
                .mode
                .parse()
                .map_err(|source| LoadError::InvalidMode { leg: idx, source })?;

            let transit = record
                .transit_countries
                .iter()
                .map(|c| {
                    CountryCode::parse_normalized(c).map_err(|source| LoadError::InvalidCountry {
                        context: format!("leg {idx} transit country"),
                        source,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let metrics = Metrics::new(record.time, record.price, record.distance, record.co2);
            let leg = Leg::new(from, to, mode, metrics, locations[to.0].country())
                .map_err(|source| LoadError::InvalidLeg { leg: idx, source })?
                .with_transit(transit)
                .with_classification(record.classification);

            if record.bidirectional {
                let back = leg.reversed(locations[from.0].country());
                legs.push(leg);
                legs.push(back);
            } else {
                legs.push(leg);
            }
        }

        Graph::new(locations, legs)
    }
}

/// Parse and validate a graph document.
pub fn parse_graph(json: &str) -> Result<Graph, LoadError> {
    let document: GraphDocument = serde_json::from_str(json)?;
    document.into_graph()
}

/// Where the graph document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphSource {
    /// Local JSON file.
    File(PathBuf),
    /// `http://` or `https://` URL returning the JSON document.
    Url(String),
}

impl GraphSource {
    /// Interpret a configuration string: URLs by scheme, anything else is a path.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            GraphSource::Url(s.to_string())
        } else {
            GraphSource::File(PathBuf::from(s))
        }
    }

    /// Fetch and parse the document.
    ///
    /// Parsing runs on the blocking pool. Dropping the returned future
    /// abandons the fetch.
    pub async fn load(&self, http: &reqwest::Client) -> Result<Graph, LoadError> {
        let body = match self {
            GraphSource::File(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| LoadError::Io {
                        path: path.display().to_string(),
                        source,
                    })?
            }
            GraphSource::Url(url) => {
                let response = http.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::HttpStatus {
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }
                response.text().await?
            }
        };

        debug!(source = %self, bytes = body.len(), "Parsing graph document");

        tokio::task::spawn_blocking(move || parse_graph(&body))
            .await
            .map_err(|e| LoadError::Task(e.to_string()))?
    }
}

impl fmt::Display for GraphSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphSource::File(path) => write!(f, "{}", path.display()),
            GraphSource::Url(url) => f.write_str(url),
        }
    }
}
