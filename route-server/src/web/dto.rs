//! Data transfer objects for web requests and responses.
//!
//! Route requests and responses are [`crate::planner::RouteQuery`] and
//! [`crate::planner::RouteResponse`] directly; the types here cover the
//! remaining endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CountryCode, Location};
use crate::regulations::ItemMatch;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub locations: usize,
    pub legs: usize,
    /// Graph generation, incremented on every successful reload
    pub generation: u64,
    pub loaded_at: DateTime<Utc>,
    /// Number of cargo regulation items, if a table is loaded
    pub regulated_items: Option<usize>,
    /// Approximate number of cached route responses
    pub cached_routes: u64,
}

/// Request to search locations by name.
#[derive(Debug, Deserialize)]
pub struct LocationSearchRequest {
    /// Search query
    pub q: String,

    /// Maximum results (default 10, capped at 50)
    pub limit: Option<usize>,
}

/// A location in search results.
#[derive(Debug, Serialize)]
pub struct LocationResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: CountryCode,
}

impl From<&Location> for LocationResult {
    fn from(location: &Location) -> Self {
        Self {
            name: location.name().to_string(),
            latitude: location.latitude(),
            longitude: location.longitude(),
            country: location.country(),
        }
    }
}

/// Location search response.
#[derive(Debug, Serialize)]
pub struct LocationSearchResponse {
    pub locations: Vec<LocationResult>,
}

/// Request to look up cargo regulations.
#[derive(Debug, Deserialize)]
pub struct RegulationLookupRequest {
    /// Free-text cargo description
    pub description: String,
}

/// A regulated item matching the description.
#[derive(Debug, Serialize)]
pub struct RegulationMatch {
    pub item: String,
    pub score: f64,
    pub prohibited_in: Vec<CountryCode>,
    pub restricted_in: Vec<CountryCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<ItemMatch<'_>> for RegulationMatch {
    fn from(m: ItemMatch<'_>) -> Self {
        Self {
            item: m.item.name.clone(),
            score: m.score,
            prohibited_in: m.item.prohibited_in.clone(),
            restricted_in: m.item.restricted_in.clone(),
            notes: m.item.notes.clone(),
        }
    }
}

/// Regulation lookup response.
#[derive(Debug, Serialize)]
pub struct RegulationLookupResponse {
    pub matches: Vec<RegulationMatch>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Machine-readable error code
    pub code: &'static str,

    /// Offending request field, for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}
