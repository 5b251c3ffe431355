//! HTTP route handlers.

use std::sync::Arc;

use axum::body::Bytes;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::planner::{EngineError, Planner, RouteQuery, RouteRequest};

use super::dto::*;
use super::state::AppState;

/// Default and maximum result counts for location search.
const DEFAULT_LOCATION_LIMIT: usize = 10;
const MAX_LOCATION_LIMIT: usize = 50;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/find_paths", post(find_paths))
        .route("/find_paths/", post(find_paths))
        .route("/locations", get(search_locations))
        .route("/regulations/lookup", post(lookup_regulations))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.graph.current().await;
    Json(HealthResponse {
        status: "ok",
        locations: snapshot.graph.location_count(),
        legs: snapshot.graph.leg_count(),
        generation: snapshot.generation,
        loaded_at: snapshot.loaded_at,
        regulated_items: state.regulations.as_ref().map(|r| r.len()),
        cached_routes: state.cache.entry_count(),
    })
}

/// Compute the best routes for a request.
async fn find_paths(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let object: Map<String, Value> = parse_body(&body)?;
    let query = RouteQuery::from_json(object)?;
    let request = RouteRequest::from_query(&query, state.engine.max_top_n)?;

    // Hold one snapshot for the whole request
    let snapshot = state.graph.current().await;

    if let Some(cached) = state.cache.get(snapshot.generation, &request).await {
        debug!(start = %request.start, goal = %request.goal, "Route cache hit");
        return Ok(Json(&*cached).into_response());
    }

    let graph = snapshot.graph.clone();
    let engine = state.engine.clone();
    let regulations = state.regulations.clone();
    let planned = request.clone();
    let response = tokio::task::spawn_blocking(move || {
        Planner::new(&graph, &engine)
            .with_regulations(regulations.as_deref())
            .plan(&planned)
    })
    .await
    .map_err(|e| AppError::Internal {
        message: format!("search task failed: {e}"),
    })??;

    info!(
        start = %request.start,
        goal = %request.goal,
        paths = response.paths.len(),
        generation = snapshot.generation,
        "Served route request"
    );

    let response = Arc::new(response);
    state
        .cache
        .insert(snapshot.generation, &request, response.clone())
        .await;

    Ok(Json(&*response).into_response())
}

/// Search locations by name.
async fn search_locations(
    State(state): State<AppState>,
    Query(req): Query<LocationSearchRequest>,
) -> Json<LocationSearchResponse> {
    let limit = req
        .limit
        .unwrap_or(DEFAULT_LOCATION_LIMIT)
        .min(MAX_LOCATION_LIMIT);
    let snapshot = state.graph.current().await;

    let locations = snapshot
        .graph
        .search_locations(&req.q, limit)
        .into_iter()
        .map(LocationResult::from)
        .collect();

    Json(LocationSearchResponse { locations })
}

/// Look up which regulated items a cargo description matches.
async fn lookup_regulations(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RegulationLookupResponse>, AppError> {
    let req: RegulationLookupRequest = parse_body(&body)?;
    let regulations = state.regulations.as_ref().ok_or_else(|| AppError::NotFound {
        message: "no cargo regulation table is configured".to_string(),
    })?;

    let matches = regulations
        .lookup(&req.description)
        .into_iter()
        .map(RegulationMatch::from)
        .collect();

    Ok(Json(RegulationLookupResponse { matches }))
}

/// Parse a JSON body by hand so malformed bodies get the same error shape
/// as every other rejection.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "Rejected malformed request body");
        AppError::Validation {
            field: None,
            message: format!("invalid JSON: {e}"),
        }
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    Validation {
        field: Option<&'static str>,
        message: String,
    },
    UnknownLocation {
        field: &'static str,
        message: String,
    },
    NoRoute { message: String },
    NotFound { message: String },
    Timeout { message: String },
    Internal { message: String },
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        let message = e.to_string();
        match e {
            EngineError::Validation { field, .. } => AppError::Validation {
                field: Some(field),
                message,
            },
            EngineError::UnknownLocation { field, .. } => {
                AppError::UnknownLocation { field, message }
            }
            EngineError::NoRouteFound { .. } => AppError::NoRoute { message },
            EngineError::Timeout(_) => AppError::Timeout { message },
        }
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, Option<&'static str>, &str) {
        match self {
            AppError::Validation { field, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                *field,
                message.as_str(),
            ),
            AppError::UnknownLocation { field, message } => (
                StatusCode::BAD_REQUEST,
                "unknown_location",
                Some(*field),
                message.as_str(),
            ),
            AppError::NoRoute { message } => {
                (StatusCode::NOT_FOUND, "no_route_found", None, message.as_str())
            }
            AppError::NotFound { message } => {
                (StatusCode::NOT_FOUND, "not_found", None, message.as_str())
            }
            AppError::Timeout { message } => {
                (StatusCode::GATEWAY_TIMEOUT, "timeout", None, message.as_str())
            }
            AppError::Internal { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", None, message.as_str())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, field, message) = self.parts();

        if status.is_server_error() {
            error!(%status, code, "{message}");
        } else {
            debug!(%status, code, "{message}");
        }

        let body = Json(ErrorResponse {
            error: message.to_string(),
            code,
            field,
        });
        (status, body).into_response()
    }
}
