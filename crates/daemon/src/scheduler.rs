use chrono::{DateTime, NaiveDate};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use roomwatch_engine::alert::rule_table;
use roomwatch_engine::asset::{is_sentinel, AssetResolver};
use roomwatch_engine::Engine;

use crate::sensor::SensorHub;

pub const RETENTION_INTERVAL: Duration = Duration::from_secs(3600);
pub const ASSET_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

pub fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Detects UTC calendar-date changes between ticks.
#[derive(Debug, Default)]
pub struct DailyBoundary {
    last: Option<NaiveDate>,
}

impl DailyBoundary {
    /// True when `now_ms` falls on a later UTC date than the previous call.
    /// The first call only records the date.
    pub fn crossed(&mut self, now_ms: i64) -> bool {
        let Some(today) = DateTime::from_timestamp_millis(now_ms).map(|t| t.date_naive()) else {
            return false;
        };
        let crossed = self.last.is_some_and(|prev| today > prev);
        if self.last.map_or(true, |prev| today > prev) {
            self.last = Some(today);
        }
        crossed
    }
}

/// One evaluation tick: poll feeds, reset exposure at midnight UTC, run
/// the rules.
pub fn run_tick(engine: &Engine, hub: &SensorHub, boundary: &mut DailyBoundary, now_ms: i64) -> usize {
    if boundary.crossed(now_ms) {
        engine.reset_exposure();
    }
    let readings = engine.poll(&hub.sources(), now_ms);
    engine.evaluate(readings, now_ms).len()
}

pub fn spawn_evaluation_loop(
    engine: Engine,
    hub: SensorHub,
    interval: Duration,
    ready: Arc<AtomicBool>,
) -> JoinHandle<()> {
    for sensor_type in hub.sensor_types() {
        engine.register_sensor(sensor_type);
    }
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        let mut boundary = DailyBoundary::default();
        loop {
            ticker.tick().await;
            let emitted = run_tick(&engine, &hub, &mut boundary, now_ms());
            if emitted > 0 {
                tracing::debug!(emitted, "tick complete");
            }
            ready.store(true, Ordering::Relaxed);
        }
    })
}

pub fn spawn_retention(engine: Engine, retention_days: u32) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(RETENTION_INTERVAL);
        loop {
            ticker.tick().await;
            engine.prune_older_than(retention_days, now_ms());
        }
    })
}

/// Resolves every rule's asset id and hands new mappings to the engine.
/// Returns the number of records backfilled.
pub async fn refresh_assets(engine: &Engine, resolver: &dyn AssetResolver) -> usize {
    let mut patched = 0;
    for def in rule_table() {
        let asset_id = resolver.resolve(def.alert_type).await;
        if is_sentinel(&asset_id) {
            continue;
        }
        if engine.asset_for(def.alert_type).as_deref() != Some(asset_id.as_str()) {
            patched += engine.assign_asset(def.alert_type, &asset_id);
        }
    }
    patched
}

pub fn spawn_asset_refresh(
    engine: Engine,
    resolver: Arc<dyn AssetResolver>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            let patched = refresh_assets(&engine, resolver.as_ref()).await;
            if patched > 0 {
                tracing::info!(patched, "asset refresh backfilled alerts");
            }
        }
    })
}
