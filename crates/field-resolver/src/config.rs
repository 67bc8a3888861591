//! Configuration for field resolution and the dataset collaborator.

use std::path::PathBuf;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;
use crate::resolver::ResolverOptions;

/// Default OPeNDAP provider for the GFS 0.25° hourly product.
pub const DEFAULT_PROVIDER_URL: &str = "https://nomads.ncep.noaa.gov/dods/gfs_0p25_1hr";

/// Configuration for the forecast service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Base URL runs are addressed under.
    pub provider_url: String,

    /// Number of opened runs kept in memory.
    pub run_cache_capacity: usize,

    /// Hours after the nominal cycle time before a run is expected online.
    pub publish_delay_hours: u32,

    /// Upper bound on overlay arrows along the longer axis.
    pub max_vectors_per_axis: usize,

    /// Directory of JSON run snapshots, when reading offline.
    pub snapshot_dir: Option<PathBuf>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            provider_url: DEFAULT_PROVIDER_URL.to_string(),
            run_cache_capacity: 4,
            publish_delay_hours: 6,
            max_vectors_per_axis: ResolverOptions::default().max_vectors_per_axis,
            snapshot_dir: None,
        }
    }
}

impl ResolverConfig {
    /// Load configuration from environment variables.
    ///
    /// Unparseable values are logged and the default kept.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("GFS_PROVIDER_URL") {
            config.provider_url = val;
        }

        if let Some(capacity) = parse_env("RUN_CACHE_CAPACITY") {
            config.run_cache_capacity = capacity;
        }

        if let Some(hours) = parse_env("PUBLISH_DELAY_HOURS") {
            config.publish_delay_hours = hours;
        }

        if let Some(max) = parse_env("MAX_VECTORS_PER_AXIS") {
            config.max_vectors_per_axis = max;
        }

        if let Ok(val) = std::env::var("GFS_SNAPSHOT_DIR") {
            config.snapshot_dir = Some(PathBuf::from(val));
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider_url.trim().is_empty() {
            return Err(ConfigError::EmptyProviderUrl);
        }

        if self.run_cache_capacity == 0 {
            return Err(ConfigError::MustBePositive {
                field: "run_cache_capacity",
            });
        }

        if self.max_vectors_per_axis == 0 {
            return Err(ConfigError::MustBePositive {
                field: "max_vectors_per_axis",
            });
        }

        Ok(())
    }

    pub fn publish_delay(&self) -> Duration {
        Duration::hours(self.publish_delay_hours as i64)
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            max_vectors_per_axis: self.max_vectors_per_axis,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    let val = std::env::var(key).ok()?;
    match val.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(key = key, value = %val, "Ignoring invalid configuration value");
            None
        }
    }
}
