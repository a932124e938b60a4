use std::sync::Arc;
use std::net::SocketAddr;
use anyhow::Context;
use skytrips_api::{app, worker, AppState};
use skytrips_core::repository::{KeyValueCache, ShortLinkStore};
use skytrips_store::{app_config::Config, HttpFlightClient, HttpShortLinkStore, MemoryCache, RedisClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skytrips_api=debug,skytrips_store=info,skytrips_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting SkyTrips API on port {}", config.server.port);

    let cache: Arc<dyn KeyValueCache> = match &config.redis.url {
        Some(url) => {
            let redis = RedisClient::new(url).await.context("Failed to connect to Redis")?;
            tracing::info!("Using Redis cache");
            Arc::new(redis)
        }
        None => {
            let memory = Arc::new(MemoryCache::new());
            tokio::spawn(worker::start_cache_purge_worker(
                memory.clone(),
                tokio::time::Duration::from_secs(60),
            ));
            tracing::info!("No Redis URL configured, using in-process cache");
            memory
        }
    };

    let flights = HttpFlightClient::new(&config.flight_api).context("Failed to build flight API client")?;

    let short_links: Option<Arc<dyn ShortLinkStore>> = if config.shortlinks.enabled {
        let store = HttpShortLinkStore::new(&config.shortlinks).context("Failed to build short-link client")?;
        Some(Arc::new(store))
    } else {
        tracing::info!("Short links disabled");
        None
    };

    let app_state = AppState {
        flights: Arc::new(flights),
        short_links,
        cache,
        public_url: config.server.public_url.clone(),
        search_defaults: config.search_defaults.clone(),
        rate_limit: config.rate_limit.clone(),
        cache_ttl: config.cache.clone(),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>()
    ).await?;

    Ok(())
}
