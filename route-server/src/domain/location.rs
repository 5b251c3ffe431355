//! Location type.

use std::fmt;

use super::{CountryCode, DomainError};

/// Arena index of a location inside a loaded graph.
///
/// Only meaningful for the graph that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocationId(pub usize);

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named place legs can start or end at (a port, airport, depot, city).
///
/// # Invariants
///
/// - `name` is non-empty and has no surrounding whitespace
/// - `latitude` is within [-90, 90] and `longitude` within [-180, 180]
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    name: String,
    latitude: f64,
    longitude: f64,
    country: CountryCode,
}

impl Location {
    /// Construct a location, validating its name and coordinates.
    pub fn new(
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        country: CountryCode,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyLocationName);
        }
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::InvalidCoordinate {
                location: trimmed.to_string(),
                axis: "latitude",
                value: latitude,
            });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidCoordinate {
                location: trimmed.to_string(),
                axis: "longitude",
                value: longitude,
            });
        }

        Ok(Self {
            name: trimmed.to_string(),
            latitude,
            longitude,
            country,
        })
    }

    /// The location's unique name, used as its external id.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// The country the location is in.
    pub fn country(&self) -> CountryCode {
        self.country
    }
}
