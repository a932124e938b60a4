use axum::{
    extract::{Path, State},
    response::Redirect,
    routing::get,
    Router,
};
use std::time::Duration;

use skytrips_core::{codec, links};

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/s/{hash}", get(resolve_short_link))
}

pub(crate) fn cache_key(hash: &str) -> String {
    format!("shortlink:{}", hash)
}

/// GET /s/{hash}
/// Redirect a short link to the full results URL
async fn resolve_short_link(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Redirect, AppError> {
    if !links::is_valid_short_hash(&hash) {
        return Err(AppError::NotFoundError(format!("Unknown short link {}", hash)));
    }

    let key = cache_key(&hash);
    match state.cache.get(&key).await {
        Ok(Some(token)) if codec::decode(&token).is_ok() => return Ok(redirect_to_results(&token)),
        Ok(Some(_)) => {
            tracing::warn!("Evicting unusable cached token for short link {}", hash);
            if let Err(e) = state.cache.delete(&key).await {
                tracing::warn!("Failed to evict short link {}: {}", hash, e);
            }
        }
        Ok(None) => {}
        Err(e) => tracing::warn!("Short link cache lookup failed for {}: {}", hash, e),
    }

    let store = state
        .short_links
        .as_ref()
        .ok_or_else(|| AppError::NotFoundError(format!("Unknown short link {}", hash)))?;

    let token = store
        .resolve(&hash)
        .await
        .map_err(|e| AppError::UpstreamError(format!("Short link lookup failed: {}", e)))?
        .ok_or_else(|| AppError::NotFoundError(format!("Unknown short link {}", hash)))?;

    // The store is external; only redirect to tokens we could have issued.
    if let Err(e) = codec::decode(&token) {
        tracing::warn!("Short link {} maps to an unusable token: {}", hash, e);
        return Err(AppError::NotFoundError(format!("Unknown short link {}", hash)));
    }

    let ttl = Duration::from_secs(state.cache_ttl.short_link_ttl_seconds);
    if let Err(e) = state.cache.set_ex(&key, &token, ttl).await {
        tracing::warn!("Failed to cache short link {}: {}", hash, e);
    }

    Ok(redirect_to_results(&token))
}

fn redirect_to_results(token: &str) -> Redirect {
    Redirect::temporary(&links::results_path(token))
}
