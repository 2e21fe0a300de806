#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("alert type '{0}' not found")]
    RuleNotFound(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("config: {0}")]
    Config(#[from] crate::config::LoadError),
}

/// Failure of a single rule during one tick. Never leaves the evaluator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleError {
    #[error("sensor '{sensor_type}' has no usable '{field}' field")]
    MissingField {
        sensor_type: &'static str,
        field: &'static str,
    },

    #[error("predicate panicked: {0}")]
    Panicked(String),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
