//! Transport leg type.
//!
//! A `Leg` is a single directed, mode-specific link between two locations
//! with its time, price, distance and CO2 costs.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{CountryCode, DomainError, LocationId, TransportMode};

/// Arena index of a leg inside a loaded graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LegId(pub usize);

impl fmt::Display for LegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "leg#{}", self.0)
    }
}

/// Regulatory classification a data source can attach to a leg's countries.
///
/// Ordered by severity: `Prohibited` outranks `Restricted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Restricted,
    Prohibited,
}

/// The four additive quantities carried by every leg.
///
/// Also used for per-path totals.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Metrics {
    /// Hours.
    pub time: f64,
    /// Currency units.
    pub price: f64,
    /// Kilometres.
    pub distance: f64,
    /// Kilograms of CO2.
    pub co2: f64,
}

impl Metrics {
    pub fn new(time: f64, price: f64, distance: f64, co2: f64) -> Self {
        Self {
            time,
            price,
            distance,
            co2,
        }
    }

    /// Field-wise sum.
    pub fn plus(self, other: Metrics) -> Metrics {
        Metrics {
            time: self.time + other.time,
            price: self.price + other.price,
            distance: self.distance + other.distance,
            co2: self.co2 + other.co2,
        }
    }

    fn validate(&self) -> Result<(), DomainError> {
        if !self.time.is_finite() || self.time <= 0.0 {
            return Err(DomainError::InvalidLegValue {
                field: "time",
                value: self.time,
                reason: "must be greater than zero",
            });
        }
        for (field, value) in [
            ("price", self.price),
            ("distance", self.distance),
            ("co2", self.co2),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::InvalidLegValue {
                    field,
                    value,
                    reason: "must be a non-negative number",
                });
            }
        }
        Ok(())
    }
}

/// A directed transport leg.
///
/// # Invariants
///
/// - `from != to`
/// - `time > 0`; `price`, `distance`, `co2` are `>= 0`; all finite
/// - `countries()` is non-empty, starts with the destination's country and
///   holds no duplicates
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    from: LocationId,
    to: LocationId,
    mode: TransportMode,
    metrics: Metrics,
    countries: Vec<CountryCode>,
    classification: Option<Classification>,
}

impl Leg {
    /// Construct a leg, validating its endpoints and costs.
    ///
    /// `destination_country` is the country of `to`; further transit
    /// countries can be added with [`Leg::with_transit`].
    pub fn new(
        from: LocationId,
        to: LocationId,
        mode: TransportMode,
        metrics: Metrics,
        destination_country: CountryCode,
    ) -> Result<Self, DomainError> {
        if from == to {
            return Err(DomainError::SelfLoop);
        }
        metrics.validate()?;

        Ok(Self {
            from,
            to,
            mode,
            metrics,
            countries: vec![destination_country],
            classification: None,
        })
    }

    /// Add countries the leg passes through on the way.
    pub fn with_transit(mut self, transit: impl IntoIterator<Item = CountryCode>) -> Self {
        for country in transit {
            if !self.countries.contains(&country) {
                self.countries.push(country);
            }
        }
        self
    }

    /// Tag the leg's countries with a regulatory classification.
    pub fn with_classification(mut self, classification: Option<Classification>) -> Self {
        self.classification = classification;
        self
    }

    /// The same leg travelled the other way.
    ///
    /// `origin_country` becomes the destination country; transit countries
    /// and classification are kept.
    pub fn reversed(&self, origin_country: CountryCode) -> Self {
        let mut countries = vec![origin_country];
        for country in &self.countries[1..] {
            if !countries.contains(country) {
                countries.push(*country);
            }
        }
        Self {
            from: self.to,
            to: self.from,
            mode: self.mode,
            metrics: self.metrics,
            countries,
            classification: self.classification,
        }
    }

    pub fn from(&self) -> LocationId {
        self.from
    }

    pub fn to(&self) -> LocationId {
        self.to
    }

    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    pub fn time(&self) -> f64 {
        self.metrics.time
    }

    pub fn price(&self) -> f64 {
        self.metrics.price
    }

    pub fn distance(&self) -> f64 {
        self.metrics.distance
    }

    pub fn co2(&self) -> f64 {
        self.metrics.co2
    }

    /// Countries transited, destination country first.
    pub fn countries(&self) -> &[CountryCode] {
        &self.countries
    }

    pub fn classification(&self) -> Option<Classification> {
        self.classification
    }
}
