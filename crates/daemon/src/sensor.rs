use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use roomwatch_engine::reading::SensorReading;
use roomwatch_engine::sensor::SensorSource;

/// Feed filled by the hardware collaborator over HTTP. Each pushed
/// reading is consumed by exactly one tick; a tick with nothing pushed
/// counts as a failed read.
#[derive(Debug)]
pub struct PushSource {
    sensor_type: String,
    latest: Mutex<Option<SensorReading>>,
}

impl PushSource {
    pub fn new(sensor_type: &str) -> Self {
        Self {
            sensor_type: sensor_type.to_string(),
            latest: Mutex::new(None),
        }
    }

    /// Replaces any reading not yet consumed.
    pub fn submit(&self, reading: SensorReading) {
        let mut slot = self.latest.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(reading);
    }
}

impl SensorSource for PushSource {
    fn sensor_type(&self) -> &str {
        &self.sensor_type
    }

    fn read(&self) -> Option<SensorReading> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn is_active(&self) -> bool {
        true
    }
}

/// The configured push feeds, one per sensor type.
#[derive(Debug, Clone, Default)]
pub struct SensorHub {
    feeds: BTreeMap<String, Arc<PushSource>>,
}

impl SensorHub {
    pub fn new<S: AsRef<str>>(sensor_types: &[S]) -> Self {
        let feeds = sensor_types
            .iter()
            .map(|t| (t.as_ref().to_string(), Arc::new(PushSource::new(t.as_ref()))))
            .collect();
        Self { feeds }
    }

    pub fn sensor_types(&self) -> impl Iterator<Item = &str> {
        self.feeds.keys().map(String::as_str)
    }

    /// Routes a reading to its feed. Returns false when the sensor type
    /// is not configured.
    pub fn submit(&self, reading: SensorReading) -> bool {
        match self.feeds.get(&reading.sensor_type) {
            Some(feed) => {
                feed.submit(reading);
                true
            }
            None => false,
        }
    }

    pub fn sources(&self) -> Vec<Arc<dyn SensorSource>> {
        self.feeds
            .values()
            .map(|f| f.clone() as Arc<dyn SensorSource>)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_is_consumed_once() {
        let feed = PushSource::new("ultrasonic");
        feed.submit(SensorReading::new("ultrasonic", "hc-sr04", 0));
        assert!(feed.read().is_some());
        assert!(feed.read().is_none());
    }

    #[test]
    fn newer_submission_replaces_pending() {
        let feed = PushSource::new("ultrasonic");
        feed.submit(SensorReading::new("ultrasonic", "hc-sr04", 1));
        feed.submit(SensorReading::new("ultrasonic", "hc-sr04", 2));
        assert_eq!(feed.read().unwrap().timestamp_ms, 2);
    }

    #[test]
    fn hub_rejects_unknown_type() {
        let hub = SensorHub::new(&["air_quality"]);
        assert!(hub.submit(SensorReading::new("air_quality", "mq135", 0)));
        assert!(!hub.submit(SensorReading::new("lux", "bh1750", 0)));
        assert_eq!(hub.sources().len(), 1);
    }
}
