use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    pub flight_api: FlightApiConfig,
    pub shortlinks: ShortLinkConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    pub search_defaults: SearchDefaults,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Absolute origin used when building shareable links, e.g. `https://skytrips.com.au`.
    #[serde(default)]
    pub public_url: String,
}

/// No URL means the in-process cache is used.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RedisConfig {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FlightApiConfig {
    pub base_url: String,
    #[serde(default = "default_offers_path")]
    pub offers_path: String,
    #[serde(default = "default_airports_path")]
    pub airports_path: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ShortLinkConfig {
    #[serde(default)]
    pub enabled: bool,
    pub base_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    pub airport_ttl_seconds: u64,
    pub short_link_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            airport_ttl_seconds: 86_400,
            short_link_ttl_seconds: 3_600,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitConfig {
    pub requests: u64,
    pub window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests: 100,
            window_seconds: 60,
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds)
    }
}

/// Values the search form starts from when no `?q=` search is available.
#[derive(Debug, Deserialize, Clone, serde::Serialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct SearchDefaults {
    pub origin_location_code: String,
    pub destination_location_code: String,
    #[serde(default = "default_currency")]
    pub currency_code: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

fn default_offers_path() -> String { "/v2/shopping/flight-offers".into() }
fn default_airports_path() -> String { "/v1/reference-data/locations".into() }
fn default_timeout_seconds() -> u64 { 15 }
fn default_currency() -> String { skytrips_core::search::DEFAULT_CURRENCY.into() }
fn default_max_results() -> u32 { skytrips_core::search::DEFAULT_MAX_RESULTS }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `SKYTRIPS_SERVER__PORT=8080`
            .add_source(
                config::Environment::with_prefix("SKYTRIPS")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        s.try_deserialize()
    }

    pub fn from_toml(source: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
