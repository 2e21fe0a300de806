mod duration;
mod exposure;
mod state;
mod window;

pub use duration::DurationTimer;
pub use exposure::ExposureAccumulator;
pub use state::{RuleTrackers, TrackerState};
pub use window::SlidingWindow;
