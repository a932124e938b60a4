pub mod app_config;
pub mod error;
pub mod redis_repo;
pub mod memory_cache;
pub mod flight_client;
pub mod shortlink_client;

pub use error::StoreError;
pub use redis_repo::RedisClient;
pub use memory_cache::MemoryCache;
pub use flight_client::HttpFlightClient;
pub use shortlink_client::HttpShortLinkStore;
