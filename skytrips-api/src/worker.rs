use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{debug, info};

use skytrips_store::MemoryCache;

/// Periodically drop expired entries from the in-process cache. Reads already
/// ignore expired entries; this only bounds memory.
pub async fn start_cache_purge_worker(cache: Arc<MemoryCache>, every: Duration) {
    info!("Cache purge worker started, running every {:?}", every);

    let mut ticker = interval(every);
    loop {
        ticker.tick().await;
        let removed = cache.purge_expired().await;
        if removed > 0 {
            debug!("Purged {} expired cache entries", removed);
        }
    }
}
