//! Web layer for the route engine.
//!
//! Provides HTTP endpoints for route search, location search and cargo
//! regulation lookup.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
