//! Declarative rule table. Adding a rule means adding a `RuleDef` entry;
//! the evaluator runs entries in declaration order.

use serde::Serialize;
use std::collections::BTreeMap;

use super::rule::{Priority, RuleConfig};
use crate::aggregator::Snapshot;
use crate::error::RuleError;
use crate::reading::DEFAULT_ZONE;
use crate::tracker::RuleTrackers;

pub const TEMPERATURE_HUMIDITY: &str = "temperature_humidity";
pub const AIR_QUALITY: &str = "air_quality";
pub const MOTION: &str = "motion_sensor";
pub const ULTRASONIC: &str = "ultrasonic";
pub const OCCUPANCY: &str = "occupancy";

const MINUTE_MS: f64 = 60_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackerKind {
    Window,
    Duration,
    Exposure,
}

pub struct RuleInput<'a> {
    pub snapshot: &'a Snapshot,
    pub config: &'a RuleConfig,
    pub now_ms: i64,
    pub tick_interval_seconds: f64,
}

/// Values a predicate observed while its condition held.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub zone_id: String,
    values: Vec<(&'static str, f64)>,
}

impl Observation {
    pub fn new(zone_id: impl Into<String>) -> Self {
        Self {
            zone_id: zone_id.into(),
            values: Vec::new(),
        }
    }

    pub fn with(mut self, key: &'static str, value: f64) -> Self {
        self.values.push((key, value));
        self
    }

    pub fn value(&self, key: &str) -> Option<f64> {
        self.values.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    fn get(&self, key: &str) -> f64 {
        self.value(key).unwrap_or(f64::NAN)
    }
}

pub type Predicate =
    fn(&RuleInput<'_>, &mut RuleTrackers<'_>) -> Result<Option<Observation>, RuleError>;

pub struct RuleDef {
    pub alert_type: &'static str,
    pub required: &'static [&'static str],
    pub trackers: &'static [TrackerKind],
    pub cooldown_minutes: u32,
    pub priority: Priority,
    pub parameters: &'static [(&'static str, f64)],
    pub predicate: Predicate,
    pub describe: fn(&Observation) -> String,
}

impl RuleDef {
    pub fn default_config(&self) -> RuleConfig {
        RuleConfig {
            alert_type: self.alert_type.to_string(),
            enabled: true,
            cooldown_minutes: self.cooldown_minutes,
            priority: self.priority,
            parameters: self
                .parameters
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
        }
    }
}

pub fn rule_table() -> &'static [RuleDef] {
    &RULES
}

pub fn find_rule(alert_type: &str) -> Option<&'static RuleDef> {
    RULES.iter().find(|r| r.alert_type == alert_type)
}

static RULES: [RuleDef; 10] = [
    RuleDef {
        alert_type: "Smart_HVAC_Load_Control",
        required: &[TEMPERATURE_HUMIDITY, AIR_QUALITY],
        trackers: &[],
        cooldown_minutes: 30,
        priority: Priority::Medium,
        parameters: &[
            ("temp_threshold", 23.0),
            ("humidity_threshold", 60.0),
            ("co2_threshold", 700.0),
        ],
        predicate: hvac_load_control,
        describe: |o| {
            format!(
                "Optimal conditions for reduced HVAC load: Temp = {}°C, Humidity = {}%, CO2 = {} ppm. Switch to energy-saving mode.",
                o.get("temperature"),
                o.get("humidity"),
                o.get("co2")
            )
        },
    },
    RuleDef {
        alert_type: "Predictive_Sick_Building_Alert",
        required: &[AIR_QUALITY, MOTION],
        trackers: &[],
        cooldown_minutes: 15,
        priority: Priority::High,
        parameters: &[("aqi_threshold", 150.0), ("co2_threshold", 1200.0)],
        predicate: sick_building,
        describe: |o| {
            let humidity = o
                .value("humidity")
                .map(|h| format!(", Humidity = {h}%"))
                .unwrap_or_default();
            format!(
                "Poor air quality detected with occupancy: AQI = {}, CO2 = {} ppm{}. Activate ventilation immediately.",
                o.get("aqi"),
                o.get("co2"),
                humidity
            )
        },
    },
    RuleDef {
        alert_type: "People_Density_Alert",
        required: &[ULTRASONIC, AIR_QUALITY],
        trackers: &[TrackerKind::Window],
        cooldown_minutes: 10,
        priority: Priority::High,
        parameters: &[
            ("entry_count_threshold", 19.0),
            ("co2_threshold", 640.0),
            ("presence_distance_cm", 100.0),
            ("window_minutes", 10.0),
        ],
        predicate: people_density,
        describe: |o| {
            format!(
                "Overcrowding detected in {}: {} entries in {} mins. CO2 = {} ppm. Increase ventilation immediately.",
                o.zone_id,
                o.get("entries"),
                o.get("window_minutes"),
                o.get("co2")
            )
        },
    },
    RuleDef {
        alert_type: "Zone_Level_Attendance_Accuracy",
        required: &[MOTION],
        trackers: &[TrackerKind::Duration],
        cooldown_minutes: 20,
        priority: Priority::Medium,
        parameters: &[("motion_timeout_minutes", 20.0)],
        predicate: attendance_accuracy,
        describe: |o| {
            format!(
                "No motion in {} for {:.0} minutes. Zone attendance records may be inaccurate.",
                o.zone_id,
                o.get("idle_minutes")
            )
        },
    },
    RuleDef {
        alert_type: "Dehumidifier_Smart_Trigger",
        required: &[TEMPERATURE_HUMIDITY],
        trackers: &[TrackerKind::Duration],
        cooldown_minutes: 20,
        priority: Priority::High,
        parameters: &[("humidity_threshold", 75.0), ("duration_minutes", 15.0)],
        predicate: dehumidifier_trigger,
        describe: |o| {
            format!(
                "Humidity above {}% for {:.0} minutes in {} (now {}%). Start dehumidifier.",
                o.get("threshold"),
                o.get("sustained_minutes"),
                o.zone_id,
                o.get("humidity")
            )
        },
    },
    RuleDef {
        alert_type: "Smart_Ventilation_Escalation",
        required: &[AIR_QUALITY, OCCUPANCY],
        trackers: &[],
        cooldown_minutes: 10,
        priority: Priority::High,
        parameters: &[
            ("co2_threshold", 1000.0),
            ("aqi_threshold", 150.0),
            ("people_threshold", 5.0),
        ],
        predicate: ventilation_escalation,
        describe: |o| {
            format!(
                "Ventilation escalation in {}: {} people present, CO2 = {} ppm, AQI = {}. Raise fresh-air intake.",
                o.zone_id,
                o.get("people"),
                o.get("co2"),
                o.get("aqi")
            )
        },
    },
    RuleDef {
        alert_type: "Real_Time_ESG_Score",
        required: &[TEMPERATURE_HUMIDITY, AIR_QUALITY],
        trackers: &[],
        cooldown_minutes: 30,
        priority: Priority::Medium,
        parameters: &[("esg_score_threshold", 70.0)],
        predicate: esg_score_rule,
        describe: |o| {
            format!(
                "Environmental score for {} dropped to {:.0} (threshold {}).",
                o.zone_id,
                o.get("score"),
                o.get("threshold")
            )
        },
    },
    RuleDef {
        alert_type: "VIP_Room_Air_Quality",
        required: &[TEMPERATURE_HUMIDITY, AIR_QUALITY],
        trackers: &[],
        cooldown_minutes: 15,
        priority: Priority::High,
        parameters: &[
            ("co2_threshold", 1000.0),
            ("aqi_threshold", 150.0),
            ("temp_min", 22.0),
            ("temp_max", 26.0),
        ],
        predicate: vip_air_quality,
        describe: |o| {
            format!(
                "VIP room {} outside comfort band: Temp = {}°C, CO2 = {} ppm, AQI = {}.",
                o.zone_id,
                o.get("temperature"),
                o.get("co2"),
                o.get("aqi")
            )
        },
    },
    RuleDef {
        alert_type: "Toilet_Occupancy_Cleaning",
        required: &[TEMPERATURE_HUMIDITY, MOTION],
        trackers: &[TrackerKind::Duration, TrackerKind::Window],
        cooldown_minutes: 45,
        priority: Priority::Medium,
        parameters: &[
            ("humidity_threshold", 70.0),
            ("duration_minutes", 30.0),
            ("usage_threshold", 50.0),
            ("usage_window_minutes", 1440.0),
        ],
        predicate: toilet_cleaning,
        describe: |o| {
            format!(
                "Cleaning needed in {}: {} uses recorded, humidity {}% held for {:.0} minutes.",
                o.zone_id,
                o.get("uses"),
                o.get("humidity"),
                o.get("humid_minutes")
            )
        },
    },
    RuleDef {
        alert_type: "Carbon_Penalty_Avoidance",
        required: &[AIR_QUALITY],
        trackers: &[TrackerKind::Exposure],
        cooldown_minutes: 60,
        priority: Priority::High,
        parameters: &[("co2_threshold", 1000.0), ("exposure_hours_threshold", 5.0)],
        predicate: carbon_penalty,
        describe: |o| {
            format!(
                "CO2 above {} ppm for {:.2} hours today in {}. Reduce occupancy or ventilate to avoid carbon penalties.",
                o.get("threshold"),
                o.get("hours"),
                o.zone_id
            )
        },
    },
];

fn number(snapshot: &Snapshot, sensor_type: &'static str, field: &'static str) -> Result<f64, RuleError> {
    snapshot
        .get(sensor_type)
        .and_then(|r| r.number(field))
        .ok_or(RuleError::MissingField { sensor_type, field })
}

fn flag(snapshot: &Snapshot, sensor_type: &'static str, field: &'static str) -> Result<bool, RuleError> {
    snapshot
        .get(sensor_type)
        .and_then(|r| r.flag(field))
        .ok_or(RuleError::MissingField { sensor_type, field })
}

fn zone_of(snapshot: &Snapshot, sensor_type: &str) -> String {
    snapshot
        .get(sensor_type)
        .map(|r| r.zone_id.clone())
        .unwrap_or_else(|| DEFAULT_ZONE.to_string())
}

fn minutes_ms(minutes: f64) -> i64 {
    (minutes * MINUTE_MS) as i64
}

fn hvac_load_control(
    input: &RuleInput<'_>,
    _trackers: &mut RuleTrackers<'_>,
) -> Result<Option<Observation>, RuleError> {
    let snap = input.snapshot;
    let cfg = input.config;
    let temp = number(snap, TEMPERATURE_HUMIDITY, "temperature_celsius")?;
    let humidity = number(snap, TEMPERATURE_HUMIDITY, "humidity_percent")?;
    let co2 = number(snap, AIR_QUALITY, "co2_ppm")?;

    let holds = temp < cfg.param("temp_threshold")
        && humidity > cfg.param("humidity_threshold")
        && co2 < cfg.param("co2_threshold");

    Ok(holds.then(|| {
        Observation::new(zone_of(snap, TEMPERATURE_HUMIDITY))
            .with("temperature", temp)
            .with("humidity", humidity)
            .with("co2", co2)
    }))
}

fn sick_building(
    input: &RuleInput<'_>,
    _trackers: &mut RuleTrackers<'_>,
) -> Result<Option<Observation>, RuleError> {
    let snap = input.snapshot;
    let cfg = input.config;
    let aqi = number(snap, AIR_QUALITY, "aqi")?;
    let co2 = number(snap, AIR_QUALITY, "co2_ppm")?;
    let motion = flag(snap, MOTION, "motion_detected")?;

    let holds =
        (aqi > cfg.param("aqi_threshold") || co2 > cfg.param("co2_threshold")) && motion;
    if !holds {
        return Ok(None);
    }

    let mut obs = Observation::new(zone_of(snap, AIR_QUALITY))
        .with("aqi", aqi)
        .with("co2", co2);
    if let Ok(humidity) = number(snap, TEMPERATURE_HUMIDITY, "humidity_percent") {
        obs = obs.with("humidity", humidity);
    }
    Ok(Some(obs))
}

fn people_density(
    input: &RuleInput<'_>,
    trackers: &mut RuleTrackers<'_>,
) -> Result<Option<Observation>, RuleError> {
    let snap = input.snapshot;
    let cfg = input.config;
    let distance = number(snap, ULTRASONIC, "distance_cm")?;
    let zone = zone_of(snap, ULTRASONIC);

    let window_minutes = cfg.param("window_minutes");
    let window = trackers.window(&zone);
    let present = distance < cfg.param("presence_distance_cm");
    if present {
        window.record_event(input.now_ms);
    }
    let entries = window.count(input.now_ms, minutes_ms(window_minutes));
    let co2 = number(snap, AIR_QUALITY, "co2_ppm")?;

    let holds = present
        && entries as f64 > cfg.param("entry_count_threshold")
        && co2 < cfg.param("co2_threshold");

    Ok(holds.then(|| {
        Observation::new(zone)
            .with("entries", entries as f64)
            .with("window_minutes", window_minutes)
            .with("co2", co2)
    }))
}

fn attendance_accuracy(
    input: &RuleInput<'_>,
    trackers: &mut RuleTrackers<'_>,
) -> Result<Option<Observation>, RuleError> {
    let snap = input.snapshot;
    let motion = flag(snap, MOTION, "motion_detected")?;
    let zone = zone_of(snap, MOTION);

    let timeout_ms = minutes_ms(input.config.param("motion_timeout_minutes"));
    let idle_ms = trackers.duration(&zone).observe(!motion, input.now_ms);

    Ok(idle_ms
        .filter(|idle| *idle >= timeout_ms)
        .map(|idle| Observation::new(zone).with("idle_minutes", idle as f64 / MINUTE_MS)))
}

fn dehumidifier_trigger(
    input: &RuleInput<'_>,
    trackers: &mut RuleTrackers<'_>,
) -> Result<Option<Observation>, RuleError> {
    let snap = input.snapshot;
    let cfg = input.config;
    let humidity = number(snap, TEMPERATURE_HUMIDITY, "humidity_percent")?;
    let zone = zone_of(snap, TEMPERATURE_HUMIDITY);

    let threshold = cfg.param("humidity_threshold");
    let required_ms = minutes_ms(cfg.param("duration_minutes"));
    let sustained = trackers
        .duration(&zone)
        .observe(humidity > threshold, input.now_ms);

    Ok(sustained.filter(|ms| *ms >= required_ms).map(|ms| {
        Observation::new(zone)
            .with("humidity", humidity)
            .with("threshold", threshold)
            .with("sustained_minutes", ms as f64 / MINUTE_MS)
    }))
}

fn ventilation_escalation(
    input: &RuleInput<'_>,
    _trackers: &mut RuleTrackers<'_>,
) -> Result<Option<Observation>, RuleError> {
    let snap = input.snapshot;
    let cfg = input.config;
    let co2 = number(snap, AIR_QUALITY, "co2_ppm")?;
    let aqi = number(snap, AIR_QUALITY, "aqi")?;
    let people = number(snap, OCCUPANCY, "people_count")?;

    let holds = (co2 > cfg.param("co2_threshold") || aqi > cfg.param("aqi_threshold"))
        && people >= cfg.param("people_threshold");

    Ok(holds.then(|| {
        Observation::new(zone_of(snap, AIR_QUALITY))
            .with("people", people)
            .with("co2", co2)
            .with("aqi", aqi)
    }))
}

/// 0..=100 comfort/emissions score; lower is worse.
pub fn esg_score(temperature: f64, humidity: f64, co2: f64, aqi: f64) -> f64 {
    let mut score = 100.0;
    score -= ((co2 - 600.0) / 10.0).clamp(0.0, 40.0);
    score -= ((aqi - 50.0) / 5.0).clamp(0.0, 30.0);
    if !(20.0..=26.0).contains(&temperature) {
        score -= 15.0;
    }
    if !(30.0..=60.0).contains(&humidity) {
        score -= 15.0;
    }
    score.clamp(0.0, 100.0)
}

fn esg_score_rule(
    input: &RuleInput<'_>,
    _trackers: &mut RuleTrackers<'_>,
) -> Result<Option<Observation>, RuleError> {
    let snap = input.snapshot;
    let temp = number(snap, TEMPERATURE_HUMIDITY, "temperature_celsius")?;
    let humidity = number(snap, TEMPERATURE_HUMIDITY, "humidity_percent")?;
    let co2 = number(snap, AIR_QUALITY, "co2_ppm")?;
    let aqi = number(snap, AIR_QUALITY, "aqi")?;

    let threshold = input.config.param("esg_score_threshold");
    let score = esg_score(temp, humidity, co2, aqi);

    Ok((score < threshold).then(|| {
        Observation::new(zone_of(snap, TEMPERATURE_HUMIDITY))
            .with("score", score)
            .with("threshold", threshold)
    }))
}

fn vip_air_quality(
    input: &RuleInput<'_>,
    _trackers: &mut RuleTrackers<'_>,
) -> Result<Option<Observation>, RuleError> {
    let snap = input.snapshot;
    let cfg = input.config;
    let temp = number(snap, TEMPERATURE_HUMIDITY, "temperature_celsius")?;
    let co2 = number(snap, AIR_QUALITY, "co2_ppm")?;
    let aqi = number(snap, AIR_QUALITY, "aqi")?;

    let holds = co2 > cfg.param("co2_threshold")
        || aqi > cfg.param("aqi_threshold")
        || temp < cfg.param("temp_min")
        || temp > cfg.param("temp_max");

    Ok(holds.then(|| {
        Observation::new(zone_of(snap, TEMPERATURE_HUMIDITY))
            .with("temperature", temp)
            .with("co2", co2)
            .with("aqi", aqi)
    }))
}

fn toilet_cleaning(
    input: &RuleInput<'_>,
    trackers: &mut RuleTrackers<'_>,
) -> Result<Option<Observation>, RuleError> {
    let snap = input.snapshot;
    let cfg = input.config;
    let humidity = number(snap, TEMPERATURE_HUMIDITY, "humidity_percent")?;
    let motion = flag(snap, MOTION, "motion_detected")?;
    let zone = zone_of(snap, TEMPERATURE_HUMIDITY);

    // Both trackers advance every tick; no short-circuit.
    let humid_ms = trackers
        .duration(&zone)
        .observe(humidity > cfg.param("humidity_threshold"), input.now_ms);

    let usage = trackers.window(&zone);
    if motion {
        usage.record_event(input.now_ms);
    }
    let uses = usage.count(input.now_ms, minutes_ms(cfg.param("usage_window_minutes")));

    let humid_too_long = humid_ms.is_some_and(|ms| ms >= minutes_ms(cfg.param("duration_minutes")));
    let heavy_use = uses as f64 >= cfg.param("usage_threshold");

    Ok((humid_too_long || heavy_use).then(|| {
        Observation::new(zone)
            .with("uses", uses as f64)
            .with("humidity", humidity)
            .with("humid_minutes", humid_ms.unwrap_or(0) as f64 / MINUTE_MS)
    }))
}

fn carbon_penalty(
    input: &RuleInput<'_>,
    trackers: &mut RuleTrackers<'_>,
) -> Result<Option<Observation>, RuleError> {
    let snap = input.snapshot;
    let cfg = input.config;
    let co2 = number(snap, AIR_QUALITY, "co2_ppm")?;
    let zone = zone_of(snap, AIR_QUALITY);

    let threshold = cfg.param("co2_threshold");
    let hours = trackers
        .exposure(&zone)
        .tick(co2 > threshold, input.tick_interval_seconds);

    Ok((hours >= cfg.param("exposure_hours_threshold")).then(|| {
        Observation::new(zone)
            .with("hours", hours)
            .with("threshold", threshold)
    }))
}
