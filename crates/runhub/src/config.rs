use std::num::NonZeroUsize;
use std::time::Duration;

use clap::Args;
use runhub_client::geocoding::{DEFAULT_GEOCODER_URL, DEFAULT_USER_AGENT};

use crate::cache::{
    EventCacheConfig, GeocodeCacheConfig, DEFAULT_EVENTS_TTL, DEFAULT_GEOCODE_CAPACITY,
    DEFAULT_GEOCODE_TTL, DEFAULT_MIN_REQUEST_INTERVAL,
};

/// Default backend URL.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Default object storage URL.
pub const DEFAULT_STORAGE_URL: &str = "http://localhost:54321";

/// Connection and cache settings, read from flags or the environment.
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Backend REST API base URL.
    #[arg(long, env = "RUNHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Service token used when no session token is set.
    #[arg(long, env = "RUNHUB_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Token of the signed-in user.
    #[arg(long, env = "RUNHUB_SESSION_TOKEN", hide_env_values = true)]
    pub session_token: Option<String>,

    /// Nominatim-compatible geocoder base URL.
    #[arg(long, env = "RUNHUB_GEOCODER_URL", default_value = DEFAULT_GEOCODER_URL)]
    pub geocoder_url: String,

    /// User-Agent sent to the geocoder.
    #[arg(long, env = "RUNHUB_GEOCODER_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub geocoder_user_agent: String,

    /// Object storage base URL.
    #[arg(long, env = "RUNHUB_STORAGE_URL", default_value = DEFAULT_STORAGE_URL)]
    pub storage_url: String,

    /// Object storage API key.
    #[arg(long, env = "RUNHUB_STORAGE_KEY", hide_env_values = true, default_value = "")]
    pub storage_key: String,

    /// Lifetime of the cached event collection, in seconds.
    #[arg(long, env = "RUNHUB_EVENTS_TTL_SECS", default_value_t = DEFAULT_EVENTS_TTL.as_secs())]
    pub events_ttl_secs: u64,

    /// Minimum spacing between event listing requests, in milliseconds.
    #[arg(long, env = "RUNHUB_MIN_REQUEST_INTERVAL_MS", default_value_t = DEFAULT_MIN_REQUEST_INTERVAL.as_millis() as u64)]
    pub min_request_interval_ms: u64,

    /// Let an empty event listing replace a non-empty cached one.
    #[arg(long, env = "RUNHUB_TRUST_EMPTY_RESPONSES")]
    pub trust_empty_responses: bool,

    /// Lifetime of a geocoded address, in seconds.
    #[arg(long, env = "RUNHUB_GEOCODE_TTL_SECS", default_value_t = DEFAULT_GEOCODE_TTL.as_secs())]
    pub geocode_ttl_secs: u64,

    /// Maximum number of geocoded addresses kept in memory.
    #[arg(long, env = "RUNHUB_GEOCODE_CAPACITY", default_value_t = DEFAULT_GEOCODE_CAPACITY)]
    pub geocode_capacity: usize,
}

impl Config {
    pub fn event_cache_config(&self) -> EventCacheConfig {
        EventCacheConfig {
            ttl: Duration::from_secs(self.events_ttl_secs),
            min_request_interval: Duration::from_millis(self.min_request_interval_ms),
            trust_empty_responses: self.trust_empty_responses,
        }
    }

    /// A capacity of zero is raised to one.
    pub fn geocode_cache_config(&self) -> GeocodeCacheConfig {
        GeocodeCacheConfig {
            capacity: NonZeroUsize::new(self.geocode_capacity).unwrap_or(NonZeroUsize::MIN),
            ..GeocodeCacheConfig::with_ttl(Duration::from_secs(self.geocode_ttl_secs))
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            session_token: None,
            geocoder_url: DEFAULT_GEOCODER_URL.to_string(),
            geocoder_user_agent: DEFAULT_USER_AGENT.to_string(),
            storage_url: DEFAULT_STORAGE_URL.to_string(),
            storage_key: String::new(),
            events_ttl_secs: DEFAULT_EVENTS_TTL.as_secs(),
            min_request_interval_ms: DEFAULT_MIN_REQUEST_INTERVAL.as_millis() as u64,
            trust_empty_responses: false,
            geocode_ttl_secs: DEFAULT_GEOCODE_TTL.as_secs(),
            geocode_capacity: DEFAULT_GEOCODE_CAPACITY,
        }
    }
}
