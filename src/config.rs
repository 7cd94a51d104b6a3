//! Runtime configuration: an optional YAML file, then `TENNOHUB_*`
//! environment overrides.
//!
//! ```yaml
//! bind_addr: "0.0.0.0:3000"
//! worldstate_url: "https://api.warframestat.us/pc"
//! market_url: "https://api.warframe.market/v1/items"
//! worldstate_ttl_secs: 300
//! drop_table_ttl_secs: 1800
//! log_level: "info"
//! ```

use std::fs;
use std::path::Path;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "tennohub.yaml";
pub const DEFAULT_WORLDSTATE_URL: &str = "https://api.warframestat.us/pc";
pub const DEFAULT_MARKET_URL: &str = "https://api.warframe.market/v1/items";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_worldstate_url")]
    pub worldstate_url: String,

    #[serde(default = "default_market_url")]
    pub market_url: String,

    /// Worldstate freshness window.
    #[serde(default = "default_worldstate_ttl_secs")]
    pub worldstate_ttl_secs: u64,

    /// Catalog freshness window.
    #[serde(default = "default_drop_table_ttl_secs")]
    pub drop_table_ttl_secs: u64,

    /// `tracing` filter directive; `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            worldstate_url: default_worldstate_url(),
            market_url: default_market_url(),
            worldstate_ttl_secs: default_worldstate_ttl_secs(),
            drop_table_ttl_secs: default_drop_table_ttl_secs(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load from `TENNOHUB_CONFIG` (or `tennohub.yaml` when present), then
    /// apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var("TENNOHUB_CONFIG").ok();
        let mut config = match explicit.as_deref() {
            Some(path) => Self::from_yaml_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).is_file() => {
                Self::from_yaml_file(DEFAULT_CONFIG_PATH)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Apply `TENNOHUB_*` overrides from `lookup`.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(value) = lookup("TENNOHUB_BIND") {
            self.bind_addr = value;
        }
        if let Some(value) = lookup("TENNOHUB_WORLDSTATE_URL") {
            self.worldstate_url = value;
        }
        if let Some(value) = lookup("TENNOHUB_MARKET_URL") {
            self.market_url = value;
        }
        if let Some(value) = lookup("TENNOHUB_WORLDSTATE_TTL_SECS") {
            self.worldstate_ttl_secs = parse_secs("TENNOHUB_WORLDSTATE_TTL_SECS", &value)?;
        }
        if let Some(value) = lookup("TENNOHUB_DROP_TABLE_TTL_SECS") {
            self.drop_table_ttl_secs = parse_secs("TENNOHUB_DROP_TABLE_TTL_SECS", &value)?;
        }
        if let Some(value) = lookup("TENNOHUB_LOG") {
            self.log_level = value;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worldstate_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "worldstate_ttl_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.drop_table_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "drop_table_ttl_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn worldstate_ttl(&self) -> TimeDelta {
        secs_to_delta(self.worldstate_ttl_secs)
    }

    pub fn drop_table_ttl(&self) -> TimeDelta {
        secs_to_delta(self.drop_table_ttl_secs)
    }
}

fn parse_secs(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|err| ConfigError::Invalid {
        key,
        reason: format!("'{value}' is not a number of seconds: {err}"),
    })
}

fn secs_to_delta(secs: u64) -> TimeDelta {
    TimeDelta::try_seconds(i64::try_from(secs).unwrap_or(i64::MAX))
        .unwrap_or(TimeDelta::MAX)
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_worldstate_url() -> String {
    DEFAULT_WORLDSTATE_URL.to_string()
}

fn default_market_url() -> String {
    DEFAULT_MARKET_URL.to_string()
}

fn default_worldstate_ttl_secs() -> u64 {
    5 * 60
}

fn default_drop_table_ttl_secs() -> u64 {
    30 * 60
}

fn default_log_level() -> String {
    "info".to_string()
}
