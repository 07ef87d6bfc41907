use alloy_primitives::Address;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::decoder::registry::CacheType;
use crate::error::Error;
use crate::protocols::ROUTER;

const ENV_PREFIX: &str = "AERODROME";

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrySettings {
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_cache_type")]
    pub cache_type: CacheType,
}

fn default_refresh_interval_secs() -> u64 {
    7 * 24 * 60 * 60
}

fn default_cache_type() -> CacheType {
    CacheType::AerodromePoolAddress
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
            cache_type: default_cache_type(),
        }
    }
}

impl RegistrySettings {
    pub fn refresh_interval(&self) -> chrono::Duration {
        i64::try_from(self.refresh_interval_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecoderSettings {
    #[serde(default = "default_router")]
    pub router: Address,
    #[serde(default)]
    pub registry: RegistrySettings,
}

fn default_router() -> Address {
    ROUTER
}

impl Default for DecoderSettings {
    fn default() -> Self {
        Self {
            router: default_router(),
            registry: RegistrySettings::default(),
        }
    }
}

impl DecoderSettings {
    /// Loads settings from an optional TOML file, then applies
    /// `AERODROME__*` overrides (`AERODROME__REGISTRY__REFRESH_INTERVAL_SECS`).
    pub fn load(path: Option<&str>) -> Result<Self, Error> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path).required(false));
        }
        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, Error> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
