use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Default)]
pub struct EngineMetrics {
    ticks: AtomicU64,
    alerts_emitted: AtomicU64,
    cooldown_suppressions: AtomicU64,
    rules_skipped: AtomicU64,
    rule_errors: AtomicU64,
    store_evictions: AtomicU64,
    sensor_read_failures: AtomicU64,
    tick_latency_sum_us: AtomicU64,
    tick_latency_count: AtomicU64,
}

impl EngineMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_ticks(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_alerts_emitted(&self, count: u64) {
        self.alerts_emitted.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_cooldown_suppressions(&self, count: u64) {
        self.cooldown_suppressions.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_rules_skipped(&self, count: u64) {
        self.rules_skipped.fetch_add(count, Ordering::Relaxed);
    }

    pub fn add_rule_errors(&self, count: u64) {
        self.rule_errors.fetch_add(count, Ordering::Relaxed);
    }

    pub fn inc_store_evictions(&self) {
        self.store_evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_sensor_read_failures(&self) {
        self.sensor_read_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_tick_latency(&self, start: Instant) {
        let us = start.elapsed().as_micros() as u64;
        self.tick_latency_sum_us.fetch_add(us, Ordering::Relaxed);
        self.tick_latency_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn ticks_val(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn alerts_emitted_val(&self) -> u64 {
        self.alerts_emitted.load(Ordering::Relaxed)
    }

    pub fn cooldown_suppressions_val(&self) -> u64 {
        self.cooldown_suppressions.load(Ordering::Relaxed)
    }

    pub fn rules_skipped_val(&self) -> u64 {
        self.rules_skipped.load(Ordering::Relaxed)
    }

    pub fn rule_errors_val(&self) -> u64 {
        self.rule_errors.load(Ordering::Relaxed)
    }

    pub fn store_evictions_val(&self) -> u64 {
        self.store_evictions.load(Ordering::Relaxed)
    }

    pub fn sensor_read_failures_val(&self) -> u64 {
        self.sensor_read_failures.load(Ordering::Relaxed)
    }

    pub fn tick_latency_vals(&self) -> (u64, u64) {
        (
            self.tick_latency_sum_us.load(Ordering::Relaxed),
            self.tick_latency_count.load(Ordering::Relaxed),
        )
    }
}
