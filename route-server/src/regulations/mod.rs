//! Cargo regulation lookup.
//!
//! Maps a free-text cargo description to the countries where matching goods
//! are prohibited or restricted. The table is a JSON object keyed by item
//! name:
//!
//! ```json
//! {
//!   "lithium batteries": {
//!     "prohibited_in": [{"iso_code": "IN"}],
//!     "restricted_in": [{"iso_code": "CN"}],
//!     "notes": "UN3480; state of charge limits apply."
//!   }
//! }
//! ```
//!
//! Descriptions are matched by substring first, then by Jaro-Winkler
//! similarity.

mod error;

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Classification, CountryCode};

pub use error::RegulationError;

/// Minimum similarity for an item to match a description.
pub const MATCH_THRESHOLD: f64 = 0.85;

/// Maximum number of items a single description can match.
pub const MAX_MATCHES: usize = 10;

/// Per-country classification derived from a cargo description.
pub type CountryClassifications = BTreeMap<CountryCode, Classification>;

#[derive(Debug, Deserialize)]
struct CountryEntry {
    iso_code: String,
}

#[derive(Debug, Deserialize)]
struct ItemRecord {
    #[serde(default)]
    prohibited_in: Vec<CountryEntry>,
    #[serde(default)]
    restricted_in: Vec<CountryEntry>,
    #[serde(default)]
    notes: Option<String>,
}

/// One regulated commodity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegulatedItem {
    /// Lower-cased item name.
    pub name: String,
    pub prohibited_in: Vec<CountryCode>,
    pub restricted_in: Vec<CountryCode>,
    pub notes: Option<String>,
}

/// An item matched against a description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemMatch<'a> {
    pub item: &'a RegulatedItem,
    /// Similarity in [0, 1]; 1.0 for substring matches.
    pub score: f64,
}

/// The loaded regulation table.
#[derive(Debug, Clone, Default)]
pub struct CargoRegulations {
    /// Sorted by name.
    items: Vec<RegulatedItem>,
}

impl CargoRegulations {
    /// Parse a regulation table.
    pub fn from_json(json: &str) -> Result<Self, RegulationError> {
        let records: HashMap<String, ItemRecord> = serde_json::from_str(json)?;

        let mut items = Vec::with_capacity(records.len());
        for (name, record) in records {
            let parse = |entries: &[CountryEntry]| {
                entries
                    .iter()
                    .map(|e| {
                        CountryCode::parse_normalized(&e.iso_code).map_err(|source| {
                            RegulationError::InvalidCountry {
                                item: name.clone(),
                                source,
                            }
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            };
            let mut prohibited_in = parse(&record.prohibited_in)?;
            let mut restricted_in = parse(&record.restricted_in)?;
            prohibited_in.sort();
            prohibited_in.dedup();
            restricted_in.sort();
            restricted_in.dedup();

            items.push(RegulatedItem {
                name: name.trim().to_lowercase(),
                prohibited_in,
                restricted_in,
                notes: record.notes.filter(|n| !n.trim().is_empty()),
            });
        }
        items.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Self { items })
    }

    /// Read and parse a regulation table file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegulationError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RegulationError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items matching `description`, best first.
    ///
    /// Ties are broken by item name. Empty descriptions match nothing.
    pub fn lookup(&self, description: &str) -> Vec<ItemMatch<'_>> {
        let query = description.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<ItemMatch<'_>> = self
            .items
            .iter()
            .filter_map(|item| {
                let score = similarity(&query, &item.name);
                (score >= MATCH_THRESHOLD).then_some(ItemMatch { item, score })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.item.name.cmp(&b.item.name))
        });
        matches.truncate(MAX_MATCHES);

        debug!(
            description = %query,
            matched = matches.len(),
            "Cargo regulation lookup"
        );

        matches
    }

    /// Countries where the described cargo is prohibited or restricted.
    ///
    /// A country listed as prohibited by any matching item is prohibited,
    /// even if another item only restricts it.
    pub fn classify(&self, description: &str) -> CountryClassifications {
        let mut classes = CountryClassifications::new();
        for m in self.lookup(description) {
            for &country in &m.item.restricted_in {
                classes
                    .entry(country)
                    .or_insert(Classification::Restricted);
            }
            for &country in &m.item.prohibited_in {
                classes.insert(country, Classification::Prohibited);
            }
        }
        classes
    }
}

/// Similarity between a lower-cased query and a lower-cased item name.
fn similarity(query: &str, name: &str) -> f64 {
    if name.is_empty() {
        return 0.0;
    }
    if query.contains(name) || name.contains(query) {
        return 1.0;
    }
    strsim::jaro_winkler(query, name)
}
