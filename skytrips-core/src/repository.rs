use async_trait::async_trait;
use std::time::Duration;

use crate::flight_api::FlightOffersRequest;
use crate::iata::Airport;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Upstream flight API. Responses are passed through as JSON.
#[async_trait]
pub trait FlightSearchClient: Send + Sync {
    async fn search_offers(
        &self,
        request: &FlightOffersRequest,
    ) -> Result<serde_json::Value, BoxError>;

    async fn search_airports(
        &self,
        keyword: &str,
    ) -> Result<Vec<Airport>, BoxError>;
}

/// Short-hash to token aliases held by the external short-link service.
#[async_trait]
pub trait ShortLinkStore: Send + Sync {
    async fn create(
        &self,
        short_hash: &str,
        token: &str,
    ) -> Result<(), BoxError>;

    async fn resolve(
        &self,
        short_hash: &str,
    ) -> Result<Option<String>, BoxError>;
}

/// Key-value cache with explicit expiry.
#[async_trait]
pub trait KeyValueCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, BoxError>;

    async fn set_ex(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), BoxError>;

    async fn delete(&self, key: &str) -> Result<(), BoxError>;

    /// Increment a counter that lives for `window`, starting the window on
    /// first increment. Returns the count after incrementing.
    async fn incr_window(
        &self,
        key: &str,
        window: Duration,
    ) -> Result<u64, BoxError>;
}
