//! Read API over stored samples and cached geometry

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use corridorwatch_core::prelude::*;
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::export::geometry_to_geojson;
use crate::store::{SqliteStore, StoredSample};

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: SqliteStore,
    pub geometry: Arc<GeometryCache>,
}

#[derive(Debug, Deserialize)]
pub struct CorridorQuery {
    corridor: String,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/traffic/latest", get(latest))
        .route("/api/traffic/health", get(health))
        .route("/api/traffic/geometry", get(geometry))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

/// Latest sample for the corridor, or `null` if none was stored yet
async fn latest(
    State(state): State<AppState>,
    Query(query): Query<CorridorQuery>,
) -> Result<Json<Option<StoredSample>>, ApiError> {
    let sample = state.store.latest(&query.corridor).await?;
    Ok(Json(sample))
}

async fn health() -> &'static str {
    "ok"
}

async fn geometry(
    State(state): State<AppState>,
    Query(query): Query<CorridorQuery>,
) -> Result<Response, ApiError> {
    let Some(geometry) = state.geometry.get(&query.corridor) else {
        return Ok((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("no geometry cached for {}", query.corridor) })),
        )
            .into_response());
    };

    let collection = geometry_to_geojson(&query.corridor, &geometry)?;
    Ok(Json(collection).into_response())
}

pub struct ApiError(anyhow::Error);

impl<E: Into<anyhow::Error>> From<E> for ApiError {
    fn from(error: E) -> Self {
        Self(error.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!("Request failed: {:#}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}
