mod registry;
mod tracker;

pub use registry::{HealthRegistry, SensorHealthStatus, SystemHealth, SystemStatus};
pub use tracker::{LivenessState, SensorHealth, DEFAULT_FAILURE_THRESHOLD, DEFAULT_STALENESS_MS};
