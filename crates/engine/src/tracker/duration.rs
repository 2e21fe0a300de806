/// Measures how long a condition has held without interruption.
///
/// A false observation discards progress; the next true observation
/// starts a fresh measurement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DurationTimer {
    since_ms: Option<i64>,
}

impl DurationTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the elapsed time while the condition holds, `None` otherwise.
    pub fn observe(&mut self, condition: bool, now_ms: i64) -> Option<i64> {
        if !condition {
            self.since_ms = None;
            return None;
        }
        let since = *self.since_ms.get_or_insert(now_ms);
        Some(now_ms - since)
    }

    pub fn since_ms(&self) -> Option<i64> {
        self.since_ms
    }
}
