pub mod aggregator;
pub mod alert;
pub mod asset;
pub mod config;
pub mod cooldown;
pub mod engine;
pub mod error;
pub mod health;
pub mod metrics;
pub mod reading;
pub mod sensor;
pub mod tracker;

pub use engine::{Engine, RuleDescriptor};
pub use error::{EngineError, Result, RuleError};
