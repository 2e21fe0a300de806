use crate::reading::SensorReading;

/// Capability interface for a hardware feed. Implementations must not
/// panic or block past their own read timeout; a failed read is `None`.
pub trait SensorSource: Send + Sync {
    fn sensor_type(&self) -> &str;
    fn read(&self) -> Option<SensorReading>;
    fn is_active(&self) -> bool;
}
