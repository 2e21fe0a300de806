use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_ZONE: &str = "Zone-1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

/// One captured sample from a sensor feed. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub sensor_type: String,
    pub sensor_id: String,
    #[serde(default = "default_zone")]
    pub zone_id: String,
    pub timestamp_ms: i64,
    pub status: SensorStatus,
    #[serde(default)]
    pub payload: HashMap<String, PayloadValue>,
}

fn default_zone() -> String {
    DEFAULT_ZONE.to_string()
}

impl SensorReading {
    pub fn new(sensor_type: &str, sensor_id: &str, timestamp_ms: i64) -> Self {
        Self {
            sensor_type: sensor_type.to_string(),
            sensor_id: sensor_id.to_string(),
            zone_id: default_zone(),
            timestamp_ms,
            status: SensorStatus::Active,
            payload: HashMap::new(),
        }
    }

    pub fn in_zone(mut self, zone_id: &str) -> Self {
        self.zone_id = zone_id.to_string();
        self
    }

    pub fn with_status(mut self, status: SensorStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_number(mut self, key: &str, value: f64) -> Self {
        self.payload.insert(key.to_string(), PayloadValue::Number(value));
        self
    }

    pub fn with_flag(mut self, key: &str, value: bool) -> Self {
        self.payload.insert(key.to_string(), PayloadValue::Flag(value));
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == SensorStatus::Active
    }

    /// Numeric field lookup. Flags read as 0/1, text never matches.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.payload.get(key)? {
            PayloadValue::Number(v) if v.is_finite() => Some(*v),
            PayloadValue::Flag(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.payload.get(key)? {
            PayloadValue::Flag(b) => Some(*b),
            PayloadValue::Number(v) => Some(*v != 0.0),
            PayloadValue::Text(_) => None,
        }
    }
}
