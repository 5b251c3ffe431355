//! Transport graph: model, document loading and the shared store.
//!
//! The graph is built once from a JSON document and never mutated. Reloads
//! build a fresh graph and swap it into the [`GraphStore`].

mod error;
mod model;
mod source;
mod store;

pub use error::LoadError;
pub use model::{Graph, LocationNotFound};
pub use source::{GraphDocument, GraphSource, LegRecord, LocationRecord, parse_graph};
pub use store::{GraphSnapshot, GraphStore};
