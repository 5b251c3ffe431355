//! Country code type.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when parsing an invalid ISO-2 country code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid country code: {reason}")]
pub struct InvalidCountryCode {
    reason: &'static str,
}

/// A valid ISO 3166-1 alpha-2 country code.
///
/// Country codes are always 2 uppercase ASCII letters. This type guarantees
/// that any `CountryCode` value is valid by construction.
///
/// # Examples
///
/// ```
/// use route_server::domain::CountryCode;
///
/// let de = CountryCode::parse("DE").unwrap();
/// assert_eq!(de.as_str(), "DE");
///
/// // Lowercase is rejected by the strict parser...
/// assert!(CountryCode::parse("de").is_err());
///
/// // ...but accepted by the normalizing one.
/// assert_eq!(CountryCode::parse_normalized(" de ").unwrap(), de);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountryCode([u8; 2]);

impl CountryCode {
    /// Parse a country code from a string.
    ///
    /// The input must be exactly 2 uppercase ASCII letters (A-Z).
    pub fn parse(s: &str) -> Result<Self, InvalidCountryCode> {
        let bytes = s.as_bytes();

        if bytes.len() != 2 {
            return Err(InvalidCountryCode {
                reason: "must be exactly 2 characters",
            });
        }

        for &b in bytes {
            if !b.is_ascii_uppercase() {
                return Err(InvalidCountryCode {
                    reason: "must be uppercase ASCII letters A-Z",
                });
            }
        }

        Ok(CountryCode([bytes[0], bytes[1]]))
    }

    /// Parse a country code after trimming whitespace and upper-casing.
    ///
    /// User input is case-insensitive; stored data should use [`Self::parse`].
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidCountryCode> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the country code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII uppercase letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Debug for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CountryCode({})", self.as_str())
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CountryCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CountryCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        CountryCode::parse_normalized(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_codes() {
        assert!(CountryCode::parse("DE").is_ok());
        assert!(CountryCode::parse("CN").is_ok());
        assert!(CountryCode::parse("US").is_ok());
        assert!(CountryCode::parse("AA").is_ok());
        assert!(CountryCode::parse("ZZ").is_ok());
    }

    #[test]
    fn reject_lowercase() {
        assert!(CountryCode::parse("de").is_err());
        assert!(CountryCode::parse("De").is_err());
    }

    #[test]
    fn reject_wrong_length() {
        assert!(CountryCode::parse("").is_err());
        assert!(CountryCode::parse("D").is_err());
        assert!(CountryCode::parse("DEU").is_err());
    }

    #[test]
    fn reject_non_letters() {
        assert!(CountryCode::parse("D1").is_err());
        assert!(CountryCode::parse("D-").is_err());
        assert!(CountryCode::parse("Ö").is_err());
    }

    #[test]
    fn normalized_accepts_mixed_case_and_whitespace() {
        let de = CountryCode::parse("DE").unwrap();
        assert_eq!(CountryCode::parse_normalized("de").unwrap(), de);
        assert_eq!(CountryCode::parse_normalized(" dE\n").unwrap(), de);
        assert!(CountryCode::parse_normalized("deu").is_err());
    }

    #[test]
    fn display_and_debug() {
        let cn = CountryCode::parse("CN").unwrap();
        assert_eq!(format!("{}", cn), "CN");
        assert_eq!(format!("{:?}", cn), "CountryCode(CN)");
    }

    #[test]
    fn serde_uses_plain_string() {
        let cn = CountryCode::parse("CN").unwrap();
        assert_eq!(serde_json::to_string(&cn).unwrap(), "\"CN\"");

        let parsed: CountryCode = serde_json::from_str("\"cn\"").unwrap();
        assert_eq!(parsed, cn);

        assert!(serde_json::from_str::<CountryCode>("\"CHN\"").is_err());
    }

    #[test]
    fn ordering_is_alphabetical() {
        let mut codes = vec![
            CountryCode::parse("US").unwrap(),
            CountryCode::parse("CN").unwrap(),
            CountryCode::parse("DE").unwrap(),
        ];
        codes.sort();
        let strs: Vec<_> = codes.iter().map(|c| c.as_str()).collect();
        assert_eq!(strs, vec!["CN", "DE", "US"]);
    }
}
