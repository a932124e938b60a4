use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::time::Duration;

use skytrips_core::Airport;

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct AirportQuery {
    pub keyword: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/airports", get(search_airports))
}

/// GET /v1/airports?keyword=
/// Airport lookup for the search form, cached per keyword
async fn search_airports(
    State(state): State<AppState>,
    Query(query): Query<AirportQuery>,
) -> Result<Json<Vec<Airport>>, AppError> {
    let keyword = query.keyword.trim();
    if keyword.chars().count() < 2 {
        return Err(AppError::ValidationError("keyword needs at least 2 characters".to_string()));
    }

    let key = format!("airports:{}", keyword.to_uppercase());

    // Cache problems degrade to an upstream lookup.
    match state.cache.get(&key).await {
        Ok(Some(cached)) => match serde_json::from_str::<Vec<Airport>>(&cached) {
            Ok(airports) => return Ok(Json(airports)),
            Err(e) => tracing::warn!("Discarding cached airports for {}: {}", key, e),
        },
        Ok(None) => {}
        Err(e) => tracing::warn!("Airport cache lookup failed: {}", e),
    }

    let airports = state
        .flights
        .search_airports(keyword)
        .await
        .map_err(|e| AppError::UpstreamError(format!("Airport lookup failed: {}", e)))?;

    let serialized = serde_json::to_string(&airports).map_err(anyhow::Error::from)?;
    let ttl = Duration::from_secs(state.cache_ttl.airport_ttl_seconds);
    if let Err(e) = state.cache.set_ex(&key, &serialized, ttl).await {
        tracing::warn!("Failed to cache airports for {}: {}", key, e);
    }

    Ok(Json(airports))
}
