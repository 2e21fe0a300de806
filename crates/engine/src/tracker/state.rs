use std::collections::HashMap;

use super::duration::DurationTimer;
use super::exposure::ExposureAccumulator;
use super::window::SlidingWindow;

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct TrackerKey {
    alert_type: String,
    zone_id: String,
}

impl TrackerKey {
    fn new(alert_type: &str, zone_id: &str) -> Self {
        Self {
            alert_type: alert_type.to_string(),
            zone_id: zone_id.to_string(),
        }
    }
}

/// Temporal tracker state for every rule, keyed by (rule, zone).
/// Entries are created on first use.
#[derive(Debug, Default)]
pub struct TrackerState {
    windows: HashMap<TrackerKey, SlidingWindow>,
    durations: HashMap<TrackerKey, DurationTimer>,
    exposures: HashMap<TrackerKey, ExposureAccumulator>,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A view restricted to one rule's trackers.
    pub fn for_rule<'a>(&'a mut self, alert_type: &'a str) -> RuleTrackers<'a> {
        RuleTrackers {
            alert_type,
            state: self,
        }
    }

    pub fn exposure_hours(&self, alert_type: &str, zone_id: &str) -> f64 {
        self.exposures
            .get(&TrackerKey::new(alert_type, zone_id))
            .map(|a| a.hours())
            .unwrap_or(0.0)
    }

    pub fn reset_exposures(&mut self) {
        for acc in self.exposures.values_mut() {
            acc.reset();
        }
    }
}

pub struct RuleTrackers<'a> {
    alert_type: &'a str,
    state: &'a mut TrackerState,
}

impl RuleTrackers<'_> {
    pub fn window(&mut self, zone_id: &str) -> &mut SlidingWindow {
        self.state
            .windows
            .entry(TrackerKey::new(self.alert_type, zone_id))
            .or_default()
    }

    pub fn duration(&mut self, zone_id: &str) -> &mut DurationTimer {
        self.state
            .durations
            .entry(TrackerKey::new(self.alert_type, zone_id))
            .or_default()
    }

    pub fn exposure(&mut self, zone_id: &str) -> &mut ExposureAccumulator {
        self.state
            .exposures
            .entry(TrackerKey::new(self.alert_type, zone_id))
            .or_default()
    }
}
