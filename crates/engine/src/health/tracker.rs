use serde::{Deserialize, Serialize};

pub const DEFAULT_FAILURE_THRESHOLD: u32 = 5;
pub const DEFAULT_STALENESS_MS: i64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LivenessState {
    Active,
    Inactive,
}

/// Failure-hysteresis state machine for one sensor feed.
///
/// Recovery is immediate on the first good read; going `Inactive` needs
/// `failure_threshold` consecutive failures.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorHealth {
    state: LivenessState,
    consecutive_failures: u32,
    last_success_ms: Option<i64>,
    failure_threshold: u32,
    staleness_ms: i64,
}

impl Default for SensorHealth {
    fn default() -> Self {
        Self::new(DEFAULT_FAILURE_THRESHOLD, DEFAULT_STALENESS_MS)
    }
}

impl SensorHealth {
    pub fn new(failure_threshold: u32, staleness_ms: i64) -> Self {
        Self {
            state: LivenessState::Inactive,
            consecutive_failures: 0,
            last_success_ms: None,
            failure_threshold: failure_threshold.max(1),
            staleness_ms,
        }
    }

    pub fn record_success(&mut self, now_ms: i64) {
        self.consecutive_failures = 0;
        self.last_success_ms = Some(now_ms);
        self.state = LivenessState::Active;
    }

    pub fn record_failure(&mut self) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        if self.consecutive_failures >= self.failure_threshold {
            self.state = LivenessState::Inactive;
        }
    }

    pub fn state(&self) -> LivenessState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == LivenessState::Active
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn last_success_ms(&self) -> Option<i64> {
        self.last_success_ms
    }

    pub fn is_healthy(&self, now_ms: i64) -> bool {
        match self.last_success_ms {
            Some(last) => self.is_active() && now_ms - last < self.staleness_ms,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_inactive() {
        let h = SensorHealth::default();
        assert_eq!(h.state(), LivenessState::Inactive);
        assert!(!h.is_healthy(0));
    }

    #[test]
    fn first_success_activates_immediately() {
        let mut h = SensorHealth::default();
        h.record_success(1000);
        assert!(h.is_active());
        assert!(h.is_healthy(1000));
    }

    #[test]
    fn single_failure_does_not_flap() {
        let mut h = SensorHealth::new(5, 60_000);
        h.record_success(0);
        for _ in 0..4 {
            h.record_failure();
        }
        assert!(h.is_active());
        assert_eq!(h.consecutive_failures(), 4);

        h.record_failure();
        assert_eq!(h.state(), LivenessState::Inactive);
    }

    #[test]
    fn success_resets_failure_counter() {
        let mut h = SensorHealth::new(3, 60_000);
        h.record_success(0);
        h.record_failure();
        h.record_failure();
        h.record_success(10);
        h.record_failure();
        h.record_failure();
        assert!(h.is_active());
        assert_eq!(h.consecutive_failures(), 2);
    }

    #[test]
    fn recovers_without_hysteresis() {
        let mut h = SensorHealth::new(1, 60_000);
        h.record_success(0);
        h.record_failure();
        assert!(!h.is_active());
        h.record_success(500);
        assert!(h.is_active());
    }

    #[test]
    fn stale_reading_is_unhealthy() {
        let mut h = SensorHealth::new(5, 60_000);
        h.record_success(0);
        assert!(h.is_healthy(59_999));
        assert!(!h.is_healthy(60_000));
        assert!(h.is_active());
    }
}
