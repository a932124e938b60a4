use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use skytrips_core::codec;
use skytrips_core::flight_api::FlightOffersRequest;
use skytrips_core::links;
use skytrips_core::repository::{KeyValueCache, ShortLinkStore};
use skytrips_core::SearchParams;
use skytrips_store::app_config::SearchDefaults;

use crate::{error::AppError, shortlinks::cache_key, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct ShareQuery {
    #[serde(default)]
    pub shorten: bool,
}

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareResponse {
    pub token: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DecodeResponse {
    pub search: Option<SearchParams>,
}

/// Either a decoded search with upstream offers, or the form defaults when
/// the request carried no usable token.
#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub search: Option<SearchParams>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<SearchDefaults>,
    pub offers: serde_json::Value,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/search/share", post(share_search))
        .route("/v1/search/decode", get(decode_search))
        .route(links::RESULTS_PATH, get(flight_results))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /v1/search/share
/// Validate a submitted search and hand back its results link
async fn share_search(
    State(state): State<AppState>,
    Query(query): Query<ShareQuery>,
    Json(search): Json<SearchParams>,
) -> Result<Json<ShareResponse>, AppError> {
    search.validate()?;
    let token = codec::encode(&search)?;

    let short_url = match (&state.short_links, query.shorten) {
        (Some(store), true) => {
            let hash = links::generate_short_hash();
            let ttl = Duration::from_secs(state.cache_ttl.short_link_ttl_seconds);
            register_short_link(store.clone(), state.cache.clone(), ttl, hash.clone(), token.clone());
            Some(state.absolute(&links::short_path(&hash)))
        }
        _ => None,
    };

    tracing::debug!(
        "Shared {:?} search {} -> {} ({} chars)",
        search.trip_type(),
        search.origin_location_code,
        search.destination_location_code,
        token.len()
    );

    Ok(Json(ShareResponse {
        url: state.absolute(&links::results_path(&token)),
        token,
        short_url,
    }))
}

/// Fire-and-forget. The full token keeps working if this never lands.
fn register_short_link(
    store: Arc<dyn ShortLinkStore>,
    cache: Arc<dyn KeyValueCache>,
    ttl: Duration,
    hash: String,
    token: String,
) {
    tokio::spawn(async move {
        if let Err(e) = cache.set_ex(&cache_key(&hash), &token, ttl).await {
            tracing::warn!("Failed to cache short link {}: {}", hash, e);
        }
        if let Err(e) = store.create(&hash, &token).await {
            tracing::warn!("Failed to register short link {}: {}", hash, e);
        }
    });
}

/// GET /v1/search/decode?q=
async fn decode_search(Query(query): Query<TokenQuery>) -> Json<DecodeResponse> {
    let search = query.q.as_deref().and_then(codec::decode_or_none);
    Json(DecodeResponse { search })
}

/// GET /flights-results?q=
/// Decode the search and forward it to the flight API
async fn flight_results(
    State(state): State<AppState>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<ResultsResponse>, AppError> {
    let Some(search) = query.q.as_deref().and_then(codec::decode_or_none) else {
        return Ok(Json(ResultsResponse {
            search: None,
            defaults: Some(state.search_defaults.clone()),
            offers: serde_json::json!([]),
        }));
    };

    search.validate()?;

    let request = FlightOffersRequest::from_search(&search);
    let offers = state
        .flights
        .search_offers(&request)
        .await
        .map_err(|e| AppError::UpstreamError(e.to_string()))?;

    Ok(Json(ResultsResponse {
        search: Some(search),
        defaults: None,
        offers,
    }))
}
