use serde::Deserialize;
use std::collections::BTreeMap;

use crate::alert::RuleConfigPatch;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EngineConfig {
    #[serde(default = "default_tick_interval")]
    pub tick_interval_seconds: u64,
    #[serde(default)]
    pub include_inactive_readings: bool,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub store: StoreConfig,
    /// Per-rule overrides keyed by alert type.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleConfigPatch>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HealthConfig {
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
    #[serde(default = "default_staleness_seconds")]
    pub staleness_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StoreConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_seconds: default_tick_interval(),
            include_inactive_readings: false,
            health: HealthConfig::default(),
            store: StoreConfig::default(),
            rules: BTreeMap::new(),
        }
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            failure_threshold: default_failure_threshold(),
            staleness_seconds: default_staleness_seconds(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            retention_days: default_retention_days(),
        }
    }
}

fn default_tick_interval() -> u64 {
    1
}

fn default_failure_threshold() -> u32 {
    crate::health::DEFAULT_FAILURE_THRESHOLD
}

fn default_staleness_seconds() -> u64 {
    60
}

fn default_capacity() -> usize {
    crate::alert::DEFAULT_CAPACITY
}

fn default_retention_days() -> u32 {
    7
}
