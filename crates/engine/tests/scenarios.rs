use std::collections::HashMap;

use roomwatch_engine::alert::test_harness::{run_harness, run_single_rule, Tick};
use roomwatch_engine::alert::{ExportFormat, RuleConfigPatch};
use roomwatch_engine::asset::ASSET_SENTINEL;
use roomwatch_engine::config::EngineConfig;
use roomwatch_engine::reading::{SensorReading, SensorStatus};
use roomwatch_engine::Engine;

const MIN: i64 = 60_000;

fn climate(now_ms: i64, temp: f64, humidity: f64) -> SensorReading {
    SensorReading::new("temperature_humidity", "dht22", now_ms)
        .with_number("temperature_celsius", temp)
        .with_number("humidity_percent", humidity)
}

fn air(now_ms: i64, co2: f64, aqi: f64) -> SensorReading {
    SensorReading::new("air_quality", "mq135", now_ms)
        .with_number("co2_ppm", co2)
        .with_number("aqi", aqi)
}

fn ultrasonic(now_ms: i64, distance_cm: f64) -> SensorReading {
    SensorReading::new("ultrasonic", "hc-sr04", now_ms).with_number("distance_cm", distance_cm)
}

fn only(alert_type: &str) -> EngineConfig {
    let mut cfg = EngineConfig::default();
    for def in roomwatch_engine::alert::rule_table() {
        cfg.rules.insert(
            def.alert_type.to_string(),
            RuleConfigPatch {
                enabled: Some(def.alert_type == alert_type),
                ..Default::default()
            },
        );
    }
    cfg
}

#[test]
fn hvac_respects_thirty_minute_cooldown() {
    let ticks = [0, 5 * MIN, 31 * MIN]
        .into_iter()
        .map(|t| Tick {
            now_ms: t,
            readings: vec![climate(t, 21.0, 65.0), air(t, 500.0, 40.0)],
        })
        .collect();
    let result = run_single_rule("Smart_HVAC_Load_Control", RuleConfigPatch::default(), ticks);

    let times: Vec<i64> = result.alerts.iter().map(|a| a.created_at_ms).collect();
    assert_eq!(times, vec![0, 31 * MIN]);
    assert_eq!(result.alerts[0].id, "ALERT_Smart_HVAC_Load_Control_0");
    assert_eq!(result.alerts[0].asset_id, ASSET_SENTINEL);
}

#[test]
fn twenty_proximity_events_fire_once() {
    let ticks = (0..21)
        .map(|i| {
            let t = i * 20_000;
            Tick {
                now_ms: t,
                readings: vec![ultrasonic(t, 40.0), air(t, 500.0, 40.0)],
            }
        })
        .collect();
    let result = run_single_rule("People_Density_Alert", RuleConfigPatch::default(), ticks);

    assert_eq!(result.count("People_Density_Alert"), 1);
    assert_eq!(result.alerts[0].created_at_ms, 19 * 20_000);
    assert_eq!(result.alerts[0].zone_id, "Zone-1");
}

#[test]
fn sustained_humidity_fires_at_fifteen_minutes() {
    let ticks = (0..=16)
        .map(|m| Tick {
            now_ms: m * MIN,
            readings: vec![climate(m * MIN, 24.0, 80.0)],
        })
        .collect();
    let result = run_single_rule("Dehumidifier_Smart_Trigger", RuleConfigPatch::default(), ticks);

    assert_eq!(result.count("Dehumidifier_Smart_Trigger"), 1);
    assert_eq!(result.alerts[0].created_at_ms, 15 * MIN);
}

#[test]
fn humidity_drop_restarts_duration() {
    let ticks: Vec<Tick> = (0..=26)
        .map(|m| {
            let humidity = if m == 10 { 60.0 } else { 80.0 };
            Tick {
                now_ms: m * MIN,
                readings: vec![climate(m * MIN, 24.0, humidity)],
            }
        })
        .collect();
    let result = run_single_rule("Dehumidifier_Smart_Trigger", RuleConfigPatch::default(), ticks);

    assert_eq!(result.count("Dehumidifier_Smart_Trigger"), 1);
    assert_eq!(result.alerts[0].created_at_ms, 26 * MIN);
}

#[test]
fn no_two_alerts_of_a_type_inside_cooldown() {
    let engine = Engine::with_defaults();
    let mut alerts = Vec::new();
    for i in 0..600i64 {
        let t = i * 20_000;
        let wobble = (i % 7) as f64;
        let readings = vec![
            climate(t, 19.0 + wobble, 55.0 + wobble * 4.0),
            air(t, 550.0 + wobble * 120.0, 40.0 + wobble * 25.0),
            ultrasonic(t, if i % 3 == 0 { 50.0 } else { 300.0 }),
            SensorReading::new("motion_sensor", "pir", t).with_flag("motion_detected", i % 2 == 0),
            SensorReading::new("occupancy", "cam", t).with_number("people_count", wobble),
        ];
        alerts.extend(engine.evaluate(readings, t));
    }
    assert!(!alerts.is_empty());

    let cooldowns: HashMap<String, i64> = engine
        .rule_configs()
        .into_iter()
        .map(|c| (c.alert_type, i64::from(c.cooldown_minutes) * MIN))
        .collect();
    let mut last: HashMap<&str, i64> = HashMap::new();
    for a in &alerts {
        if let Some(prev) = last.insert(&a.alert_type, a.created_at_ms) {
            assert!(a.created_at_ms - prev >= cooldowns[&a.alert_type], "{}", a.alert_type);
        }
    }
}

#[test]
fn store_evicts_oldest_beyond_capacity() {
    let mut cfg = only("Smart_HVAC_Load_Control");
    cfg.store.capacity = 3;
    cfg.rules.get_mut("Smart_HVAC_Load_Control").unwrap().cooldown_minutes = Some(1);
    let engine = Engine::new(&cfg).unwrap();

    for m in 0..5 {
        engine.evaluate(vec![climate(m * MIN, 21.0, 65.0), air(m * MIN, 500.0, 40.0)], m * MIN);
    }

    let stored = engine.list_alerts(None);
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[0].created_at_ms, 4 * MIN);
    assert!(stored.iter().all(|a| a.created_at_ms >= 2 * MIN));
    assert_eq!(engine.metrics().store_evictions_val(), 2);
}

#[test]
fn carbon_exposure_accumulates_and_resets() {
    let mut cfg = only("Carbon_Penalty_Avoidance");
    cfg.tick_interval_seconds = 3600;
    let engine = Engine::new(&cfg).unwrap();

    let mut fired = Vec::new();
    for h in 0..5 {
        let t = h * 60 * MIN;
        fired.extend(engine.evaluate(vec![air(t, 1500.0, 40.0)], t));
    }
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].created_at_ms, 4 * 60 * MIN);
    assert_eq!(engine.exposure_hours("Carbon_Penalty_Avoidance", "Zone-1"), 5.0);

    // Clean air leaves the total unchanged.
    engine.evaluate(vec![air(5 * 60 * MIN, 500.0, 40.0)], 5 * 60 * MIN);
    assert_eq!(engine.exposure_hours("Carbon_Penalty_Avoidance", "Zone-1"), 5.0);

    engine.reset_exposure();
    assert_eq!(engine.exposure_hours("Carbon_Penalty_Avoidance", "Zone-1"), 0.0);
}

#[test]
fn missing_sensor_skips_rule_silently() {
    let engine = Engine::new(&only("Smart_HVAC_Load_Control")).unwrap();
    let fired = engine.evaluate(vec![air(0, 500.0, 40.0)], 0);
    assert!(fired.is_empty());
    assert_eq!(engine.metrics().rules_skipped_val(), 1);
    assert_eq!(engine.metrics().rule_errors_val(), 0);
}

#[test]
fn inactive_readings_excluded_unless_configured() {
    let inactive = || {
        vec![
            climate(0, 21.0, 65.0).with_status(SensorStatus::Inactive),
            air(0, 500.0, 40.0),
        ]
    };

    let engine = Engine::new(&only("Smart_HVAC_Load_Control")).unwrap();
    assert!(engine.evaluate(inactive(), 0).is_empty());

    let mut cfg = only("Smart_HVAC_Load_Control");
    cfg.include_inactive_readings = true;
    let engine = Engine::new(&cfg).unwrap();
    assert_eq!(engine.evaluate(inactive(), 0).len(), 1);
}

#[test]
fn zones_keep_independent_windows() {
    let mut ticks = Vec::new();
    for i in 0..20 {
        let t = i * 20_000;
        let zone = if i % 2 == 0 { "Lobby" } else { "Hall" };
        ticks.push(Tick {
            now_ms: t,
            readings: vec![ultrasonic(t, 40.0).in_zone(zone), air(t, 500.0, 40.0)],
        });
    }
    let result = run_harness(only("People_Density_Alert"), ticks);
    assert_eq!(result.count("People_Density_Alert"), 0);
}

#[test]
fn export_and_backfill_round_out_the_store() {
    let engine = Engine::new(&only("Smart_HVAC_Load_Control")).unwrap();
    engine.evaluate(vec![climate(0, 21.0, 65.0), air(0, 500.0, 40.0)], 0);

    assert_eq!(engine.assign_asset("Smart_HVAC_Load_Control", "MCN-02"), 1);
    let csv = engine.export(Some("MCN-02"), ExportFormat::Csv);
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("id,alert_type,priority,zone_id,asset_id,created_at,lifecycle_stage,description")
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with("ALERT_Smart_HVAC_Load_Control_0,Smart_HVAC_Load_Control,Medium,Zone-1,MCN-02,1970-01-01T00:00:00Z,"));

    let summary = engine.summary(MIN);
    assert_eq!(summary.total_alerts, 1);
    assert_eq!(summary.alert_types["Smart_HVAC_Load_Control"].count, 1);
}
