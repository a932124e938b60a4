use std::sync::Arc;

use skytrips_core::repository::{FlightSearchClient, KeyValueCache, ShortLinkStore};
use skytrips_store::app_config::{CacheConfig, RateLimitConfig, SearchDefaults};

#[derive(Clone)]
pub struct AppState {
    pub flights: Arc<dyn FlightSearchClient>,
    /// `None` when short links are disabled.
    pub short_links: Option<Arc<dyn ShortLinkStore>>,
    pub cache: Arc<dyn KeyValueCache>,
    /// Prefix for absolute links, without a trailing slash.
    pub public_url: String,
    pub search_defaults: SearchDefaults,
    pub rate_limit: RateLimitConfig,
    pub cache_ttl: CacheConfig,
}

impl AppState {
    pub fn absolute(&self, path: &str) -> String {
        format!("{}{}", self.public_url.trim_end_matches('/'), path)
    }
}
