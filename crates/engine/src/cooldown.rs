use std::collections::HashMap;

/// Per-alert-type rate limiter.
///
/// `allow` is a check-and-set: a granted call claims the emission slot, so
/// of two calls inside one cooldown only the first is granted. Callers
/// that share a gate across threads must serialize access.
#[derive(Debug, Clone, Default)]
pub struct CooldownGate {
    last_emission: HashMap<String, i64>,
}

impl CooldownGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow(&mut self, alert_type: &str, cooldown_minutes: u32, now_ms: i64) -> bool {
        if let Some(&last) = self.last_emission.get(alert_type) {
            let cooldown_ms = i64::from(cooldown_minutes) * 60_000;
            if now_ms - last < cooldown_ms {
                return false;
            }
        }
        self.last_emission.insert(alert_type.to_string(), now_ms);
        true
    }

    pub fn last_emission_ms(&self, alert_type: &str) -> Option<i64> {
        self.last_emission.get(alert_type).copied()
    }
}
