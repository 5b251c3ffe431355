//! Transport mode type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown transport mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown transport mode: {0:?} (expected land, sea or air)")]
pub struct InvalidTransportMode(pub String);

/// The closed set of ways a leg can be travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Land,
    Sea,
    Air,
}

impl TransportMode {
    /// All modes, in declaration order.
    pub const ALL: [TransportMode; 3] = [TransportMode::Land, TransportMode::Sea, TransportMode::Air];

    /// Returns the lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Land => "land",
            TransportMode::Sea => "sea",
            TransportMode::Air => "air",
        }
    }
}

impl FromStr for TransportMode {
    type Err = InvalidTransportMode;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "land" => Ok(TransportMode::Land),
            "sea" => Ok(TransportMode::Sea),
            "air" => Ok(TransportMode::Air),
            _ => Err(InvalidTransportMode(s.to_string())),
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
