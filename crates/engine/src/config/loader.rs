use std::path::Path;

use super::schema::EngineConfig;
use crate::alert::find_rule;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("validation: {0}")]
    Validation(String),
}

pub fn load_from_file(path: &Path) -> Result<EngineConfig, LoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}

pub fn load_from_str(yaml: &str) -> Result<EngineConfig, LoadError> {
    let cfg: EngineConfig = serde_yaml::from_str(yaml)?;
    validate(&cfg)?;
    Ok(cfg)
}

pub fn validate(cfg: &EngineConfig) -> Result<(), LoadError> {
    if cfg.tick_interval_seconds == 0 {
        return Err(LoadError::Validation(
            "tick_interval_seconds must be > 0".into(),
        ));
    }
    if cfg.health.failure_threshold == 0 {
        return Err(LoadError::Validation(
            "health.failure_threshold must be > 0".into(),
        ));
    }
    if cfg.store.capacity == 0 {
        return Err(LoadError::Validation("store.capacity must be > 0".into()));
    }
    for (alert_type, patch) in &cfg.rules {
        let def = find_rule(alert_type).ok_or_else(|| {
            LoadError::Validation(format!("unknown rule '{alert_type}'"))
        })?;
        patch
            .validate_for(&def.default_config())
            .map_err(LoadError::Validation)?;
    }
    Ok(())
}
