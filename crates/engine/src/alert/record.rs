use serde::{Deserialize, Serialize};

use super::rule::Priority;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleStage {
    Active,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: String,
    pub alert_type: String,
    pub description: String,
    pub priority: Priority,
    pub zone_id: String,
    pub asset_id: String,
    pub created_at_ms: i64,
    pub lifecycle_stage: LifecycleStage,
}

/// Cooldowns are at least a minute, so type plus second is unique.
pub fn alert_id(alert_type: &str, created_at_ms: i64) -> String {
    format!("ALERT_{}_{}", alert_type, created_at_ms.div_euclid(1000))
}
