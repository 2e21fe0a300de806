use std::collections::BTreeMap;

use crate::alert::record::AlertRecord;
use crate::alert::rule::RuleConfigPatch;
use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::reading::SensorReading;

pub struct Tick {
    pub now_ms: i64,
    pub readings: Vec<SensorReading>,
}

pub struct HarnessResult {
    pub alerts: Vec<AlertRecord>,
    pub counts: BTreeMap<String, usize>,
}

impl HarnessResult {
    pub fn count(&self, alert_type: &str) -> usize {
        self.counts.get(alert_type).copied().unwrap_or(0)
    }
}

pub fn run_single_rule(alert_type: &str, patch: RuleConfigPatch, ticks: Vec<Tick>) -> HarnessResult {
    let mut config = EngineConfig::default();
    for def in crate::alert::rule_table() {
        let p = if def.alert_type == alert_type {
            RuleConfigPatch {
                enabled: Some(true),
                ..patch.clone()
            }
        } else {
            RuleConfigPatch {
                enabled: Some(false),
                ..Default::default()
            }
        };
        config.rules.insert(def.alert_type.to_string(), p);
    }
    run_harness(config, ticks)
}

pub fn run_harness(config: EngineConfig, ticks: Vec<Tick>) -> HarnessResult {
    let engine = match Engine::new(&config) {
        Ok(engine) => engine,
        Err(e) => panic!("harness config rejected: {e}"),
    };
    let mut alerts = Vec::new();
    for tick in ticks {
        alerts.extend(engine.evaluate(tick.readings, tick.now_ms));
    }

    let mut counts = BTreeMap::new();
    for a in &alerts {
        *counts.entry(a.alert_type.clone()).or_insert(0) += 1;
    }
    HarnessResult { alerts, counts }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn climate(now_ms: i64, humidity: f64) -> Tick {
        Tick {
            now_ms,
            readings: vec![SensorReading::new("temperature_humidity", "dht22", now_ms)
                .with_number("temperature_celsius", 24.0)
                .with_number("humidity_percent", humidity)],
        }
    }

    #[test]
    fn only_selected_rule_runs() {
        let ticks = (0..5).map(|i| climate(i * 60_000, 90.0)).collect();
        let result = run_single_rule("VIP_Room_Air_Quality", RuleConfigPatch::default(), ticks);
        assert!(result.alerts.is_empty());
    }

    #[test]
    fn counts_by_type() {
        let ticks = (0..=15).map(|i| climate(i * 60_000, 90.0)).collect();
        let result = run_single_rule("Dehumidifier_Smart_Trigger", RuleConfigPatch::default(), ticks);
        assert_eq!(result.count("Dehumidifier_Smart_Trigger"), 1);
        assert_eq!(result.alerts.len(), 1);
    }
}
