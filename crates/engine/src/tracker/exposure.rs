/// Running total of hours a condition has held, sampled once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExposureAccumulator {
    hours: f64,
}

impl ExposureAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self, condition: bool, interval_seconds: f64) -> f64 {
        if condition && interval_seconds > 0.0 {
            self.hours += interval_seconds / 3600.0;
        }
        self.hours
    }

    pub fn hours(&self) -> f64 {
        self.hours
    }

    pub fn reset(&mut self) {
        self.hours = 0.0;
    }
}
