use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::data::item::Item;
use crate::data::relic::Relic;
use crate::data::worldstate::{WorldCategory, WorldEvent};
use crate::server::state::AppState;

/// Errors surfaced to HTTP callers as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            tracing::error!(%detail, "request failed");
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("failed to encode response: {err}"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub items: Vec<Item>,
    pub relics: Vec<Relic>,
    pub query: String,
}

pub async fn health() -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "tennohub",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `GET /api/search?q=`. An empty `q` is forwarded as-is and matches the
/// whole catalog; only a missing `q` is a client error.
pub async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = params
        .ok()
        .and_then(|Query(params)| params.q)
        .ok_or_else(|| ApiError::BadRequest("Query parameter is required".to_string()))?;

    let (items, relics) = tokio::join!(
        state.drop_tables.search_items(&query),
        state.drop_tables.search_relics(&query),
    );

    Ok(Json(SearchResponse {
        items,
        relics,
        query,
    }))
}

pub async fn worldstate(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let snapshot = state.worldstate.fetch_worldstate().await;
    Ok(Json(serde_json::to_value(snapshot.as_ref())?))
}

pub async fn worldstate_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<WorldEvent>>, ApiError> {
    let category = WorldCategory::from_slug(&category).ok_or_else(|| {
        ApiError::NotFound(format!("Unknown worldstate category '{category}'"))
    })?;
    Ok(Json(state.worldstate.category(category).await))
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
