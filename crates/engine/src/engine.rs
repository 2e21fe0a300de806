use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use crate::aggregator::{build_snapshot, Snapshot};
use crate::alert::{
    rule_table, AlertRecord, AlertStore, AlertSummary, Evaluator, ExportFormat, RuleConfig,
    RuleConfigPatch, TrackerKind,
};
use crate::asset::AssetMap;
use crate::config::{self, EngineConfig};
use crate::error::{EngineError, Result};
use crate::health::{HealthRegistry, SensorHealthStatus, SystemStatus};
use crate::metrics::EngineMetrics;
use crate::reading::{SensorReading, SensorStatus};
use crate::sensor::SensorSource;

/// A rule's live configuration plus the static parts of its definition.
#[derive(Debug, Clone, Serialize)]
pub struct RuleDescriptor {
    #[serde(flatten)]
    pub config: RuleConfig,
    pub required_sensors: Vec<String>,
    pub trackers: Vec<TrackerKind>,
}

struct EngineState {
    evaluator: Evaluator,
    store: AlertStore,
    health: HealthRegistry,
    assets: AssetMap,
    latest: Snapshot,
}

/// Shared handle over the evaluation state. Cloning is cheap; every clone
/// sees the same store, trackers and cooldowns. Ticks and reads are
/// serialized by one lock, and reads hand out owned copies.
#[derive(Clone)]
pub struct Engine {
    state: Arc<Mutex<EngineState>>,
    metrics: Arc<EngineMetrics>,
    tick_interval_seconds: f64,
    include_inactive: bool,
}

impl Engine {
    pub fn new(cfg: &EngineConfig) -> Result<Self> {
        config::validate(cfg)?;

        let mut evaluator = Evaluator::new();
        for (alert_type, patch) in &cfg.rules {
            evaluator.update_config(alert_type, patch)?;
        }

        let staleness_ms = i64::try_from(cfg.health.staleness_seconds.saturating_mul(1000))
            .map_err(|_| EngineError::Validation("health.staleness_seconds out of range".into()))?;

        Ok(Self::assemble(evaluator, cfg, staleness_ms))
    }

    pub fn with_defaults() -> Self {
        let cfg = EngineConfig::default();
        let staleness_ms = cfg.health.staleness_seconds as i64 * 1000;
        Self::assemble(Evaluator::new(), &cfg, staleness_ms)
    }

    fn assemble(evaluator: Evaluator, cfg: &EngineConfig, staleness_ms: i64) -> Self {
        Self {
            state: Arc::new(Mutex::new(EngineState {
                evaluator,
                store: AlertStore::new(cfg.store.capacity),
                health: HealthRegistry::new(cfg.health.failure_threshold, staleness_ms),
                assets: AssetMap::default(),
                latest: Snapshot::default(),
            })),
            metrics: EngineMetrics::new(),
            tick_interval_seconds: cfg.tick_interval_seconds as f64,
            include_inactive: cfg.include_inactive_readings,
        }
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn metrics(&self) -> &Arc<EngineMetrics> {
        &self.metrics
    }

    pub fn register_sensor(&self, sensor_type: &str) {
        self.lock().health.register(sensor_type);
    }

    /// Records the outcome of one hardware read.
    pub fn record_read(&self, sensor_type: &str, success: bool, now_ms: i64) {
        let mut state = self.lock();
        if success {
            state.health.record_success(sensor_type, now_ms);
        } else {
            state.health.record_failure(sensor_type);
            self.metrics.inc_sensor_read_failures();
        }
    }

    /// Reads every source once. Reads happen outside the lock; a source
    /// that yields nothing is recorded as a failure and skipped.
    pub fn poll(&self, sources: &[Arc<dyn SensorSource>], now_ms: i64) -> Vec<SensorReading> {
        let mut readings = Vec::with_capacity(sources.len());
        let mut outcomes = Vec::with_capacity(sources.len());

        for source in sources {
            match source.read() {
                Some(mut reading) => {
                    if !source.is_active() {
                        reading.status = SensorStatus::Inactive;
                    }
                    // A sample flagged inactive is a failed read for liveness.
                    let success = reading.is_active();
                    if !success {
                        tracing::debug!(sensor_type = source.sensor_type(), "inactive reading");
                    }
                    outcomes.push((source.sensor_type().to_string(), success));
                    readings.push(reading);
                }
                None => {
                    tracing::debug!(sensor_type = source.sensor_type(), "no reading");
                    outcomes.push((source.sensor_type().to_string(), false));
                }
            }
        }

        for (sensor_type, success) in outcomes {
            self.record_read(&sensor_type, success, now_ms);
        }
        readings
    }

    /// One tick: aggregate, run every enabled rule, store what fired.
    pub fn evaluate(&self, readings: Vec<SensorReading>, now_ms: i64) -> Vec<AlertRecord> {
        let start = Instant::now();
        let snapshot = build_snapshot(readings, self.include_inactive);

        let mut state = self.lock();
        let EngineState {
            evaluator,
            store,
            assets,
            latest,
            ..
        } = &mut *state;

        let report = evaluator.evaluate(&snapshot, now_ms, self.tick_interval_seconds, assets);
        *latest = snapshot;
        for record in &report.alerts {
            if let Some(evicted) = store.append(record.clone()) {
                tracing::debug!(id = %evicted.id, "alert store full, oldest evicted");
                self.metrics.inc_store_evictions();
            }
        }
        drop(state);

        self.metrics.inc_ticks();
        self.metrics.add_alerts_emitted(report.alerts.len() as u64);
        self.metrics
            .add_cooldown_suppressions(report.suppressed_by_cooldown as u64);
        self.metrics
            .add_rules_skipped(report.skipped_missing_input as u64);
        self.metrics.add_rule_errors(report.rule_errors as u64);
        self.metrics.record_tick_latency(start);

        report.alerts
    }

    /// Most recent first; everything when `limit` is `None`.
    pub fn list_alerts(&self, limit: Option<usize>) -> Vec<AlertRecord> {
        let state = self.lock();
        state.store.recent(limit.unwrap_or(usize::MAX))
    }

    pub fn alerts_for_asset(&self, asset_id: &str) -> Vec<AlertRecord> {
        self.lock().store.by_asset(asset_id)
    }

    pub fn summary(&self, now_ms: i64) -> AlertSummary {
        let state = self.lock();
        state.store.summary(state.evaluator.configs(), now_ms)
    }

    pub fn export(&self, asset_id: Option<&str>, format: ExportFormat) -> String {
        self.lock().store.export(asset_id, format)
    }

    pub fn prune_older_than(&self, days: u32, now_ms: i64) -> usize {
        let removed = self.lock().store.prune_older_than(days, now_ms);
        if removed > 0 {
            tracing::info!(removed, days, "pruned old alerts");
        }
        removed
    }

    pub fn rule_configs(&self) -> Vec<RuleConfig> {
        self.lock().evaluator.configs().to_vec()
    }

    pub fn rules(&self) -> Vec<RuleDescriptor> {
        let configs = self.rule_configs();
        rule_table()
            .iter()
            .zip(configs)
            .map(|(def, config)| RuleDescriptor {
                config,
                required_sensors: def.required.iter().map(|s| s.to_string()).collect(),
                trackers: def.trackers.to_vec(),
            })
            .collect()
    }

    pub fn update_rule_config(
        &self,
        alert_type: &str,
        patch: &RuleConfigPatch,
    ) -> Result<RuleConfig> {
        let updated = self.lock().evaluator.update_config(alert_type, patch)?;
        tracing::info!(alert_type, "rule config updated");
        Ok(updated)
    }

    /// Readings seen by the last tick, keyed by sensor type.
    pub fn latest_readings(&self) -> BTreeMap<String, SensorReading> {
        self.lock().latest.to_map()
    }

    pub fn latest_reading(&self, sensor_type: &str) -> Option<SensorReading> {
        self.lock().latest.get(sensor_type).cloned()
    }

    pub fn health_status(&self, now_ms: i64) -> BTreeMap<String, SensorHealthStatus> {
        self.lock().health.status(now_ms)
    }

    pub fn system_status(&self, now_ms: i64) -> SystemStatus {
        self.lock().health.system_status(now_ms)
    }

    pub fn asset_for(&self, alert_type: &str) -> Option<String> {
        self.lock().assets.get(alert_type).map(str::to_string)
    }

    /// Stores a resolved mapping and backfills records emitted while it
    /// was unknown. Returns the number of records patched.
    pub fn assign_asset(&self, alert_type: &str, asset_id: &str) -> usize {
        let mut state = self.lock();
        state.assets.insert(alert_type, asset_id);
        let patched = state.store.backfill_asset(alert_type, asset_id);
        if patched > 0 {
            tracing::info!(alert_type, asset_id, patched, "asset id backfilled");
        }
        patched
    }

    pub fn reset_exposure(&self) {
        self.lock().evaluator.trackers_mut().reset_exposures();
        tracing::info!("exposure accumulators reset");
    }

    pub fn exposure_hours(&self, alert_type: &str, zone_id: &str) -> f64 {
        self.lock()
            .evaluator
            .trackers()
            .exposure_hours(alert_type, zone_id)
    }
}
