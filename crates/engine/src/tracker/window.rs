use std::collections::VecDeque;

/// Event timestamps within a look-back horizon, oldest first.
#[derive(Debug, Clone, Default)]
pub struct SlidingWindow {
    events: VecDeque<i64>,
}

impl SlidingWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&mut self, now_ms: i64) {
        self.events.push_back(now_ms);
    }

    /// Drops events older than `now_ms - window_ms`, then counts the rest.
    pub fn count(&mut self, now_ms: i64, window_ms: i64) -> usize {
        self.evict(now_ms - window_ms);
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    fn evict(&mut self, cutoff_ms: i64) {
        while let Some(&ts) = self.events.front() {
            if ts < cutoff_ms {
                self.events.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: i64 = 60_000;

    #[test]
    fn counts_events_inside_horizon() {
        let mut w = SlidingWindow::new();
        w.record_event(0);
        w.record_event(MIN);
        w.record_event(2 * MIN);
        assert_eq!(w.count(2 * MIN, 10 * MIN), 3);
    }

    #[test]
    fn evicts_events_older_than_horizon() {
        let mut w = SlidingWindow::new();
        w.record_event(0);
        w.record_event(5 * MIN);
        w.record_event(11 * MIN);
        assert_eq!(w.count(11 * MIN, 10 * MIN), 2);
    }

    #[test]
    fn event_exactly_at_cutoff_is_kept() {
        let mut w = SlidingWindow::new();
        w.record_event(MIN);
        assert_eq!(w.count(11 * MIN, 10 * MIN), 1);
        assert_eq!(w.count(11 * MIN + 1, 10 * MIN), 0);
        assert!(w.is_empty());
    }

    #[test]
    fn empty_window_counts_zero() {
        let mut w = SlidingWindow::new();
        assert_eq!(w.count(1_000, MIN), 0);
    }
}
