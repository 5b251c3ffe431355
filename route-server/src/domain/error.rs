//! Domain error types.
//!
//! These errors represent validation failures in the domain layer.
//! They are distinct from loading/IO errors, which wrap them.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    /// Location has no name
    #[error("location name must not be empty")]
    EmptyLocationName,

    /// Coordinate outside its valid range or not finite
    #[error("location {location}: {axis} {value} is out of range")]
    InvalidCoordinate {
        location: String,
        axis: &'static str,
        value: f64,
    },

    /// Leg cost field outside its valid range or not finite
    #[error("invalid leg {field}: {value} ({reason})")]
    InvalidLegValue {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Leg starts and ends at the same location
    #[error("leg must connect two different locations")]
    SelfLoop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::EmptyLocationName;
        assert_eq!(err.to_string(), "location name must not be empty");

        let err = DomainError::InvalidCoordinate {
            location: "Oslo".into(),
            axis: "latitude",
            value: 95.0,
        };
        assert_eq!(err.to_string(), "location Oslo: latitude 95 is out of range");

        let err = DomainError::InvalidLegValue {
            field: "time",
            value: 0.0,
            reason: "must be greater than zero",
        };
        assert_eq!(
            err.to_string(),
            "invalid leg time: 0 (must be greater than zero)"
        );

        let err = DomainError::SelfLoop;
        assert_eq!(err.to_string(), "leg must connect two different locations");
    }
}
