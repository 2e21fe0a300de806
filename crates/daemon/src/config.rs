use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::net::SocketAddr;
use std::path::Path;

use roomwatch_engine::alert::{find_rule, AIR_QUALITY, MOTION, OCCUPANCY, TEMPERATURE_HUMIDITY, ULTRASONIC};
use roomwatch_engine::config::{self as engine_config, EngineConfig, LoadError};

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DaemonConfig {
    #[serde(default = "default_api_addr")]
    pub api_addr: String,
    #[serde(default)]
    pub engine: EngineConfig,
    /// Static alert type to asset id mappings.
    #[serde(default)]
    pub assets: BTreeMap<String, String>,
    #[serde(default = "default_asset_ttl")]
    pub asset_cache_ttl_seconds: u64,
    #[serde(default = "default_sensors")]
    pub sensors: Vec<String>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            api_addr: default_api_addr(),
            engine: EngineConfig::default(),
            assets: BTreeMap::new(),
            asset_cache_ttl_seconds: default_asset_ttl(),
            sensors: default_sensors(),
        }
    }
}

fn default_api_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_asset_ttl() -> u64 {
    300
}

fn default_sensors() -> Vec<String> {
    [TEMPERATURE_HUMIDITY, AIR_QUALITY, MOTION, ULTRASONIC, OCCUPANCY]
        .into_iter()
        .map(String::from)
        .collect()
}

pub fn load_from_file(path: &Path) -> Result<DaemonConfig, LoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}

pub fn load_from_str(yaml: &str) -> Result<DaemonConfig, LoadError> {
    let cfg: DaemonConfig = serde_yaml::from_str(yaml)?;
    validate(&cfg)?;
    Ok(cfg)
}

fn validate(cfg: &DaemonConfig) -> Result<(), LoadError> {
    cfg.api_addr
        .parse::<SocketAddr>()
        .map_err(|e| LoadError::Validation(format!("api_addr '{}': {e}", cfg.api_addr)))?;

    engine_config::validate(&cfg.engine)?;

    if cfg.sensors.is_empty() {
        return Err(LoadError::Validation("sensors must not be empty".into()));
    }
    let mut seen = HashSet::new();
    for s in &cfg.sensors {
        if s.is_empty() {
            return Err(LoadError::Validation("sensor type must not be empty".into()));
        }
        if !seen.insert(s.as_str()) {
            return Err(LoadError::Validation(format!("duplicate sensor '{s}'")));
        }
    }

    for (alert_type, asset_id) in &cfg.assets {
        if find_rule(alert_type).is_none() {
            return Err(LoadError::Validation(format!(
                "assets: unknown rule '{alert_type}'"
            )));
        }
        if asset_id.is_empty() {
            return Err(LoadError::Validation(format!(
                "assets: empty asset id for '{alert_type}'"
            )));
        }
    }
    Ok(())
}
