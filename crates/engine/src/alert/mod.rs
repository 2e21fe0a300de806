mod evaluator;
mod export;
mod record;
mod rule;
mod store;
mod table;
pub mod test_harness;

pub use evaluator::{Evaluator, TickReport};
pub use export::{rfc3339, ExportFormat};
pub use record::{alert_id, AlertRecord, LifecycleStage};
pub use rule::{Priority, RuleConfig, RuleConfigPatch};
pub use store::{AlertStore, AlertSummary, AlertTypeSummary, DEFAULT_CAPACITY};
pub use table::{
    esg_score, find_rule, rule_table, Observation, Predicate, RuleDef, RuleInput, TrackerKind,
    AIR_QUALITY, MOTION, OCCUPANCY, TEMPERATURE_HUMIDITY, ULTRASONIC,
};
