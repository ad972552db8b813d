//! Application configuration loaded from environment variables.
//!
//! Every knob has a default so the service starts with an empty environment.

use crate::services::rewards::RewardSettings;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Default wait between the end of one tracking cycle and the next.
pub const DEFAULT_TRACKING_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// GeoJSON file holding the attraction catalog
    pub attractions_path: String,
    /// Statute miles within which a visit earns a reward
    pub proximity_buffer_miles: f64,
    /// Statute miles within which an attraction is worth showing
    pub attraction_proximity_range_miles: f64,
    /// Sleep between tracking cycles
    pub tracking_interval: Duration,
    /// Maximum in-flight per-user tasks in one batch
    pub reward_worker_pool_size: usize,
    /// Number of generated users when running in test mode
    pub internal_user_count: usize,
    /// Seed the store with generated users at startup
    pub test_mode: bool,
    /// Upper bound of the artificial delay added by the simulated providers
    pub simulated_provider_latency: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            attractions_path: "data/attractions.geojson".to_string(),
            proximity_buffer_miles: 10.0,
            attraction_proximity_range_miles: 200.0,
            tracking_interval: DEFAULT_TRACKING_INTERVAL,
            reward_worker_pool_size: 5000,
            internal_user_count: 100,
            test_mode: true,
            simulated_provider_latency: Duration::ZERO,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();

        Ok(Self {
            port: parse_var("PORT", defaults.port)?,
            attractions_path: env::var("ATTRACTIONS_PATH").unwrap_or(defaults.attractions_path),
            proximity_buffer_miles: parse_var(
                "PROXIMITY_BUFFER_MILES",
                defaults.proximity_buffer_miles,
            )?,
            attraction_proximity_range_miles: parse_var(
                "ATTRACTION_PROXIMITY_RANGE_MILES",
                defaults.attraction_proximity_range_miles,
            )?,
            tracking_interval: Duration::from_secs(parse_var(
                "TRACKING_INTERVAL_SECS",
                defaults.tracking_interval.as_secs(),
            )?),
            reward_worker_pool_size: parse_var(
                "REWARD_WORKER_POOL_SIZE",
                defaults.reward_worker_pool_size,
            )?
            .max(1),
            internal_user_count: parse_var("INTERNAL_USER_COUNT", defaults.internal_user_count)?,
            test_mode: parse_var("TEST_MODE", defaults.test_mode)?,
            simulated_provider_latency: Duration::from_millis(parse_var(
                "SIMULATED_PROVIDER_LATENCY_MS",
                0u64,
            )?),
        })
    }

    /// Reward engine settings derived from this configuration.
    pub fn reward_settings(&self) -> RewardSettings {
        RewardSettings {
            proximity_buffer_miles: self.proximity_buffer_miles,
            attraction_proximity_range_miles: self.attraction_proximity_range_miles,
            worker_pool_size: self.reward_worker_pool_size,
        }
    }
}

/// Parse an optional environment variable, using `default` when unset.
fn parse_var<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}
