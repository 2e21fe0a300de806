use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub alert_type: String,
    pub enabled: bool,
    pub cooldown_minutes: u32,
    pub priority: Priority,
    pub parameters: BTreeMap<String, f64>,
}

impl RuleConfig {
    /// Threshold lookup. The key set is fixed by the rule table, so a
    /// miss yields NaN and every comparison against it is false.
    pub fn param(&self, key: &str) -> f64 {
        self.parameters.get(key).copied().unwrap_or(f64::NAN)
    }

    pub fn apply(&mut self, patch: &RuleConfigPatch) -> Result<(), String> {
        patch.validate_for(self)?;

        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        if let Some(cooldown) = patch.cooldown_minutes {
            self.cooldown_minutes = cooldown;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        for (key, value) in &patch.parameters {
            self.parameters.insert(key.clone(), *value);
        }
        Ok(())
    }
}

/// Partial update. Threshold keys sit beside the fixed options, e.g.
/// `{ "cooldown_minutes": 10, "temp_threshold": 24.5 }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(flatten)]
    pub parameters: BTreeMap<String, f64>,
}

impl RuleConfigPatch {
    pub fn validate_for(&self, config: &RuleConfig) -> Result<(), String> {
        if self.cooldown_minutes == Some(0) {
            return Err("cooldown_minutes must be >= 1".into());
        }
        for (key, value) in &self.parameters {
            if !config.parameters.contains_key(key) {
                return Err(format!(
                    "unknown parameter '{key}' for {}",
                    config.alert_type
                ));
            }
            if !value.is_finite() {
                return Err(format!("parameter '{key}' must be a finite number"));
            }
        }
        Ok(())
    }
}
