use std::panic::{self, AssertUnwindSafe};

use super::record::{alert_id, AlertRecord, LifecycleStage};
use super::rule::{RuleConfig, RuleConfigPatch};
use super::table::{rule_table, Observation, RuleDef, RuleInput};
use crate::aggregator::Snapshot;
use crate::asset::AssetMap;
use crate::cooldown::CooldownGate;
use crate::error::{EngineError, RuleError};
use crate::tracker::TrackerState;

#[derive(Debug, Default)]
pub struct TickReport {
    pub alerts: Vec<AlertRecord>,
    pub skipped_missing_input: usize,
    pub suppressed_by_cooldown: usize,
    pub rule_errors: usize,
}

pub struct Evaluator {
    rules: &'static [RuleDef],
    configs: Vec<RuleConfig>,
    trackers: TrackerState,
    cooldowns: CooldownGate,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        let rules = rule_table();
        Self {
            rules,
            configs: rules.iter().map(RuleDef::default_config).collect(),
            trackers: TrackerState::new(),
            cooldowns: CooldownGate::new(),
        }
    }

    pub fn configs(&self) -> &[RuleConfig] {
        &self.configs
    }

    pub fn config(&self, alert_type: &str) -> Option<&RuleConfig> {
        self.configs.iter().find(|c| c.alert_type == alert_type)
    }

    pub fn update_config(
        &mut self,
        alert_type: &str,
        patch: &RuleConfigPatch,
    ) -> Result<RuleConfig, EngineError> {
        let config = self
            .configs
            .iter_mut()
            .find(|c| c.alert_type == alert_type)
            .ok_or_else(|| EngineError::RuleNotFound(alert_type.to_string()))?;
        config.apply(patch).map_err(EngineError::Validation)?;
        Ok(config.clone())
    }

    pub fn trackers(&self) -> &TrackerState {
        &self.trackers
    }

    pub fn trackers_mut(&mut self) -> &mut TrackerState {
        &mut self.trackers
    }

    /// One full rule pass in declaration order. A failing rule is logged
    /// and counted; the remaining rules still run.
    pub fn evaluate(
        &mut self,
        snapshot: &Snapshot,
        now_ms: i64,
        tick_interval_seconds: f64,
        assets: &AssetMap,
    ) -> TickReport {
        let mut report = TickReport::default();

        for (def, config) in self.rules.iter().zip(&self.configs) {
            if !config.enabled {
                continue;
            }
            if !snapshot.has_all(def.required) {
                tracing::trace!(alert_type = def.alert_type, "required sensors absent, skipping");
                report.skipped_missing_input += 1;
                continue;
            }

            let input = RuleInput {
                snapshot,
                config,
                now_ms,
                tick_interval_seconds,
            };
            let mut trackers = self.trackers.for_rule(def.alert_type);
            let outcome = panic::catch_unwind(AssertUnwindSafe(
                || -> Result<Option<(Observation, String)>, RuleError> {
                    let observed = (def.predicate)(&input, &mut trackers)?;
                    Ok(observed.map(|obs| {
                        let description = (def.describe)(&obs);
                        (obs, description)
                    }))
                },
            ))
            .unwrap_or_else(|payload| Err(RuleError::Panicked(panic_message(payload.as_ref()))));

            let (observation, description) = match outcome {
                Ok(Some(fired)) => fired,
                Ok(None) => continue,
                Err(e @ RuleError::MissingField { .. }) => {
                    tracing::debug!(alert_type = def.alert_type, error = %e, "rule skipped");
                    report.skipped_missing_input += 1;
                    continue;
                }
                Err(e) => {
                    tracing::error!(alert_type = def.alert_type, error = %e, "rule evaluation failed");
                    report.rule_errors += 1;
                    continue;
                }
            };

            if !self
                .cooldowns
                .allow(def.alert_type, config.cooldown_minutes, now_ms)
            {
                tracing::debug!(alert_type = def.alert_type, "condition holds, in cooldown");
                report.suppressed_by_cooldown += 1;
                continue;
            }

            let record = AlertRecord {
                id: alert_id(def.alert_type, now_ms),
                alert_type: def.alert_type.to_string(),
                description,
                priority: config.priority,
                zone_id: observation.zone_id,
                asset_id: assets.get_or_sentinel(def.alert_type),
                created_at_ms: now_ms,
                lifecycle_stage: LifecycleStage::Active,
            };
            tracing::info!(
                alert_type = %record.alert_type,
                zone_id = %record.zone_id,
                priority = record.priority.as_str(),
                "alert emitted"
            );
            report.alerts.push(record);
        }

        report
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".into()
    }
}
