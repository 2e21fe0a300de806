use serde::Serialize;
use std::collections::BTreeMap;

use super::tracker::SensorHealth;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorHealthStatus {
    pub healthy: bool,
    pub active: bool,
    pub last_reading_ms: Option<i64>,
    pub consecutive_failures: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemHealth {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemStatus {
    pub total_sensors: usize,
    pub active_sensors: usize,
    pub healthy_sensors: usize,
    pub system_health: SystemHealth,
}

/// Liveness of every known sensor feed, keyed by sensor type.
#[derive(Debug, Clone)]
pub struct HealthRegistry {
    sensors: BTreeMap<String, SensorHealth>,
    failure_threshold: u32,
    staleness_ms: i64,
}

impl HealthRegistry {
    pub fn new(failure_threshold: u32, staleness_ms: i64) -> Self {
        Self {
            sensors: BTreeMap::new(),
            failure_threshold,
            staleness_ms,
        }
    }

    /// Makes a feed visible in status output before its first read.
    pub fn register(&mut self, sensor_type: &str) {
        self.entry(sensor_type);
    }

    pub fn record_success(&mut self, sensor_type: &str, now_ms: i64) {
        self.entry(sensor_type).record_success(now_ms);
    }

    pub fn record_failure(&mut self, sensor_type: &str) {
        self.entry(sensor_type).record_failure();
    }

    pub fn get(&self, sensor_type: &str) -> Option<&SensorHealth> {
        self.sensors.get(sensor_type)
    }

    pub fn status(&self, now_ms: i64) -> BTreeMap<String, SensorHealthStatus> {
        self.sensors
            .iter()
            .map(|(t, h)| {
                (
                    t.clone(),
                    SensorHealthStatus {
                        healthy: h.is_healthy(now_ms),
                        active: h.is_active(),
                        last_reading_ms: h.last_success_ms(),
                        consecutive_failures: h.consecutive_failures(),
                    },
                )
            })
            .collect()
    }

    pub fn system_status(&self, now_ms: i64) -> SystemStatus {
        let active_sensors = self.sensors.values().filter(|h| h.is_active()).count();
        let healthy_sensors = self
            .sensors
            .values()
            .filter(|h| h.is_healthy(now_ms))
            .count();
        SystemStatus {
            total_sensors: self.sensors.len(),
            active_sensors,
            healthy_sensors,
            system_health: if healthy_sensors == active_sensors {
                SystemHealth::Healthy
            } else {
                SystemHealth::Degraded
            },
        }
    }

    fn entry(&mut self, sensor_type: &str) -> &mut SensorHealth {
        let (threshold, staleness) = (self.failure_threshold, self.staleness_ms);
        self.sensors
            .entry(sensor_type.to_string())
            .or_insert_with(|| SensorHealth::new(threshold, staleness))
    }
}
