//! Service configuration
//!
//! Read from environment variables, falling back to defaults:
//!   PROJECTION_DEFAULT_YEARS   - horizon when a request omits `years` (50)
//!   PROJECTION_MAX_YEARS       - largest accepted `years` (100)
//!   PROJECTION_CACHE_TTL_SECS  - response cache lifetime, 0 disables (300)
//!   PROJECTION_CACHE_MAX_ENTRIES - most responses held in cache, 0 disables (300)

use std::env;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_YEARS: u32 = 50;
pub const DEFAULT_MAX_YEARS: u32 = 100;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 300;

/// Invalid configuration value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} has invalid value {value:?}")]
    InvalidValue { name: &'static str, value: String },

    #[error("{name} must be at least 1")]
    ZeroYears { name: &'static str },

    #[error("PROJECTION_DEFAULT_YEARS ({default}) exceeds PROJECTION_MAX_YEARS ({max})")]
    DefaultAboveMax { default: u32, max: u32 },
}

/// Settings for the HTTP projection endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Horizon used when a request has no `years` parameter
    pub default_years: u32,

    /// Largest `years` a request may ask for
    pub max_years: u32,

    /// How long identical requests are answered from cache
    pub cache_ttl: Duration,

    /// Upper bound on cached response bodies
    pub cache_max_entries: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_years: DEFAULT_YEARS,
            max_years: DEFAULT_MAX_YEARS,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_years = read_var(&lookup, "PROJECTION_DEFAULT_YEARS", DEFAULT_YEARS)?;
        let max_years = read_var(&lookup, "PROJECTION_MAX_YEARS", DEFAULT_MAX_YEARS)?;
        let cache_ttl_secs = read_var(&lookup, "PROJECTION_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?;
        let cache_max_entries = read_var(&lookup, "PROJECTION_CACHE_MAX_ENTRIES", DEFAULT_CACHE_MAX_ENTRIES)?;

        if default_years == 0 {
            return Err(ConfigError::ZeroYears { name: "PROJECTION_DEFAULT_YEARS" });
        }
        if max_years == 0 {
            return Err(ConfigError::ZeroYears { name: "PROJECTION_MAX_YEARS" });
        }
        if default_years > max_years {
            return Err(ConfigError::DefaultAboveMax {
                default: default_years,
                max: max_years,
            });
        }

        Ok(Self {
            default_years,
            max_years,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            cache_max_entries,
        })
    }

    pub fn caching_enabled(&self) -> bool {
        !self.cache_ttl.is_zero() && self.cache_max_entries > 0
    }
}

fn read_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue { name, value: raw }),
    }
}
