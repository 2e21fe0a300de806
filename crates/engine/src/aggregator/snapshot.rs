use std::collections::{BTreeMap, HashMap};

use crate::reading::SensorReading;

/// Latest reading per sensor type for one evaluation tick.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    readings: HashMap<String, SensorReading>,
}

impl Snapshot {
    pub fn get(&self, sensor_type: &str) -> Option<&SensorReading> {
        self.readings.get(sensor_type)
    }

    pub fn contains(&self, sensor_type: &str) -> bool {
        self.readings.contains_key(sensor_type)
    }

    pub fn has_all(&self, sensor_types: &[&str]) -> bool {
        sensor_types.iter().all(|t| self.contains(t))
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn sensor_types(&self) -> impl Iterator<Item = &str> {
        self.readings.keys().map(String::as_str)
    }

    pub fn to_map(&self) -> BTreeMap<String, SensorReading> {
        self.readings
            .iter()
            .map(|(t, r)| (t.clone(), r.clone()))
            .collect()
    }
}

/// Merge one tick of raw readings. Later readings of the same type win.
/// Inactive readings are dropped unless `include_inactive` is set.
pub fn build_snapshot<I>(readings: I, include_inactive: bool) -> Snapshot
where
    I: IntoIterator<Item = SensorReading>,
{
    let mut merged = HashMap::new();
    for reading in readings {
        if !include_inactive && !reading.is_active() {
            continue;
        }
        merged.insert(reading.sensor_type.clone(), reading);
    }
    Snapshot { readings: merged }
}
