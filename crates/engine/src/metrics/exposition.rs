use super::engine_metrics::EngineMetrics;

pub fn render_prometheus(m: &EngineMetrics) -> String {
    let mut out = String::with_capacity(1024);

    write_counter(&mut out, "roomwatch_ticks_total", m.ticks_val());
    write_counter(&mut out, "roomwatch_alerts_emitted_total", m.alerts_emitted_val());
    write_counter(&mut out, "roomwatch_cooldown_suppressions_total", m.cooldown_suppressions_val());
    write_counter(&mut out, "roomwatch_rules_skipped_total", m.rules_skipped_val());
    write_counter(&mut out, "roomwatch_rule_errors_total", m.rule_errors_val());
    write_counter(&mut out, "roomwatch_store_evictions_total", m.store_evictions_val());
    write_counter(&mut out, "roomwatch_sensor_read_failures_total", m.sensor_read_failures_val());

    let (sum, count) = m.tick_latency_vals();
    write_summary(&mut out, "roomwatch_tick_latency_us", sum, count);

    out
}

fn write_counter(out: &mut String, name: &str, val: u64) {
    use std::fmt::Write;
    let _ = writeln!(out, "# TYPE {name} counter");
    let _ = writeln!(out, "{name} {val}");
}

fn write_summary(out: &mut String, name: &str, sum: u64, count: u64) {
    use std::fmt::Write;
    let _ = writeln!(out, "# TYPE {name} summary");
    let _ = writeln!(out, "{name}_sum {sum}");
    let _ = writeln!(out, "{name}_count {count}");
}
