use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};

use super::export::{self, ExportFormat};
use super::record::AlertRecord;
use super::rule::{Priority, RuleConfig};
use crate::asset::is_sentinel;

pub const DEFAULT_CAPACITY: usize = 1000;

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertTypeSummary {
    pub count: usize,
    pub last_triggered_ms: Option<i64>,
    pub priority: Priority,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertSummary {
    pub total_alerts: usize,
    pub alert_types: BTreeMap<String, AlertTypeSummary>,
    pub generated_at_ms: i64,
}

#[derive(Debug, Clone)]
pub struct AlertStore {
    records: VecDeque<AlertRecord>,
    capacity: usize,
}

impl Default for AlertStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl AlertStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity,
        }
    }

    /// Returns the evicted record, if any.
    pub fn append(&mut self, record: AlertRecord) -> Option<AlertRecord> {
        let evicted = if self.records.len() >= self.capacity {
            self.records.pop_front()
        } else {
            None
        };
        self.records.push_back(record);
        evicted
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn all(&self) -> Vec<AlertRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn recent(&self, limit: usize) -> Vec<AlertRecord> {
        self.records.iter().rev().take(limit).cloned().collect()
    }

    pub fn by_asset(&self, asset_id: &str) -> Vec<AlertRecord> {
        self.records
            .iter()
            .filter(|r| r.asset_id == asset_id)
            .cloned()
            .collect()
    }

    pub fn summary(&self, configs: &[RuleConfig], now_ms: i64) -> AlertSummary {
        let mut alert_types: BTreeMap<String, AlertTypeSummary> = BTreeMap::new();
        for r in &self.records {
            let entry = alert_types
                .entry(r.alert_type.clone())
                .or_insert_with(|| AlertTypeSummary {
                    count: 0,
                    last_triggered_ms: None,
                    priority: r.priority,
                    enabled: configs
                        .iter()
                        .find(|c| c.alert_type == r.alert_type)
                        .map(|c| c.enabled)
                        .unwrap_or(true),
                });
            entry.count += 1;
            if entry.last_triggered_ms.map_or(true, |t| r.created_at_ms > t) {
                entry.last_triggered_ms = Some(r.created_at_ms);
            }
        }
        AlertSummary {
            total_alerts: self.records.len(),
            alert_types,
            generated_at_ms: now_ms,
        }
    }

    pub fn prune_older_than(&mut self, days: u32, now_ms: i64) -> usize {
        let cutoff = now_ms - i64::from(days) * DAY_MS;
        let before = self.records.len();
        self.records.retain(|r| r.created_at_ms >= cutoff);
        before - self.records.len()
    }

    /// Fills in a late-resolved asset id on records that still carry the
    /// sentinel. Returns the number patched.
    pub fn backfill_asset(&mut self, alert_type: &str, asset_id: &str) -> usize {
        let mut patched = 0;
        for r in self
            .records
            .iter_mut()
            .filter(|r| r.alert_type == alert_type && is_sentinel(&r.asset_id))
        {
            r.asset_id = asset_id.to_string();
            patched += 1;
        }
        patched
    }

    pub fn export(&self, asset_id: Option<&str>, format: ExportFormat) -> String {
        let selected = self
            .records
            .iter()
            .filter(|r| asset_id.map_or(true, |a| r.asset_id == a));
        export::render(selected, format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::record::{alert_id, LifecycleStage};
    use crate::asset::ASSET_SENTINEL;

    fn rec(alert_type: &str, created_at_ms: i64, asset_id: &str) -> AlertRecord {
        AlertRecord {
            id: alert_id(alert_type, created_at_ms),
            alert_type: alert_type.into(),
            description: "d".into(),
            priority: Priority::Medium,
            zone_id: "Zone-1".into(),
            asset_id: asset_id.into(),
            created_at_ms,
            lifecycle_stage: LifecycleStage::Active,
        }
    }

    #[test]
    fn never_exceeds_capacity_and_drops_oldest() {
        let mut store = AlertStore::new(1000);
        for i in 0..1001 {
            store.append(rec("A", i * 1000, "x"));
        }
        assert_eq!(store.len(), 1000);
        let all = store.all();
        assert_eq!(all.first().unwrap().created_at_ms, 1000);
        assert!(all.iter().all(|r| r.created_at_ms != 0));
    }

    #[test]
    fn append_returns_evicted() {
        let mut store = AlertStore::new(1);
        assert!(store.append(rec("A", 0, "x")).is_none());
        let evicted = store.append(rec("A", 1000, "x")).unwrap();
        assert_eq!(evicted.created_at_ms, 0);
    }

    #[test]
    fn recent_is_newest_first() {
        let mut store = AlertStore::default();
        for i in 0..5 {
            store.append(rec("A", i * 1000, "x"));
        }
        let recent: Vec<i64> = store.recent(3).iter().map(|r| r.created_at_ms).collect();
        assert_eq!(recent, vec![4000, 3000, 2000]);
    }

    #[test]
    fn summary_counts_per_type() {
        let mut store = AlertStore::default();
        store.append(rec("A", 1000, "x"));
        store.append(rec("A", 5000, "x"));
        store.append(rec("B", 3000, "x"));

        let configs = vec![RuleConfig {
            alert_type: "B".into(),
            enabled: false,
            cooldown_minutes: 1,
            priority: Priority::Low,
            parameters: Default::default(),
        }];
        let s = store.summary(&configs, 9000);
        assert_eq!(s.total_alerts, 3);
        assert_eq!(s.alert_types["A"].count, 2);
        assert_eq!(s.alert_types["A"].last_triggered_ms, Some(5000));
        assert!(s.alert_types["A"].enabled);
        assert!(!s.alert_types["B"].enabled);
        assert_eq!(s.generated_at_ms, 9000);
    }

    #[test]
    fn by_asset_filters() {
        let mut store = AlertStore::default();
        store.append(rec("A", 0, "MCN-01"));
        store.append(rec("B", 0, "MCN-02"));
        assert_eq!(store.by_asset("MCN-02").len(), 1);
    }

    #[test]
    fn prune_removes_only_old_records() {
        let mut store = AlertStore::default();
        let now = 10 * DAY_MS;
        store.append(rec("A", now - 8 * DAY_MS, "x"));
        store.append(rec("A", now - 2 * DAY_MS, "x"));
        assert_eq!(store.prune_older_than(7, now), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn backfill_patches_only_sentinel_records_of_type() {
        let mut store = AlertStore::default();
        store.append(rec("A", 0, ASSET_SENTINEL));
        store.append(rec("A", 1000, "kept"));
        store.append(rec("B", 2000, ASSET_SENTINEL));

        assert_eq!(store.backfill_asset("A", "MCN-09"), 1);
        let all = store.all();
        assert_eq!(all[0].asset_id, "MCN-09");
        assert_eq!(all[1].asset_id, "kept");
        assert_eq!(all[2].asset_id, ASSET_SENTINEL);
    }

    #[test]
    fn export_filters_by_asset() {
        let mut store = AlertStore::default();
        store.append(rec("A", 0, "MCN-01"));
        store.append(rec("B", 0, "MCN-02"));
        let csv = store.export(Some("MCN-01"), ExportFormat::Csv);
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.contains("MCN-01"));
        assert!(!csv.contains("MCN-02"));
    }
}
