//! Pool configuration
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `SLOTPOOL_*` environment variables.

use crate::error::{Error, Result};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Prefix for environment overrides, e.g. `SLOTPOOL_INITIAL_CAPACITY=64`
pub const ENV_PREFIX: &str = "SLOTPOOL";

/// Pool sizing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of slots the pool starts with
    #[serde(default = "default_initial_capacity")]
    pub initial_capacity: usize,
    /// Growth limit. `None` lets the pool double without bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_capacity: Option<usize>,
}

fn default_initial_capacity() -> usize {
    PoolConfig::DEFAULT_INITIAL_CAPACITY
}

impl PoolConfig {
    /// Default number of initial slots
    pub const DEFAULT_INITIAL_CAPACITY: usize = 16;

    /// Config with the given initial capacity and no growth limit
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            max_capacity: None,
        }
    }

    /// Load configuration from defaults, an optional TOML file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_from(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_from(path: Option<&Path>, env: Environment) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("initial_capacity", Self::DEFAULT_INITIAL_CAPACITY as i64)
            .map_err(|e| Error::Config(format!("Invalid default: {}", e)))?;

        if let Some(path) = path {
            debug!(path = ?path, "Reading pool configuration file");
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        let config: Self = builder
            .add_source(env.try_parsing(true))
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| Error::Config(format!("Failed to load configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)
            .map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Render as a TOML document
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize configuration: {}", e)))
    }

    /// Check that the limit leaves room for the initial capacity
    pub fn validate(&self) -> Result<()> {
        if let Some(limit) = self.max_capacity {
            if limit < self.initial_capacity {
                return Err(Error::Config(format!(
                    "max_capacity {} is below initial_capacity {}",
                    limit, self.initial_capacity
                )));
            }
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL_CAPACITY)
    }
}
