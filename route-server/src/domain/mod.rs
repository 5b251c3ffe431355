//! Domain types for the route engine.
//!
//! This module contains the core domain model types that represent
//! validated transport data. All types enforce their invariants at
//! construction time, so code that receives these types can trust their
//! validity.

mod country;
mod error;
mod leg;
mod location;
mod mode;

pub use country::{CountryCode, InvalidCountryCode};
pub use error::DomainError;
pub use leg::{Classification, Leg, LegId, Metrics};
pub use location::{Location, LocationId};
pub use mode::{InvalidTransportMode, TransportMode};
