mod engine_metrics;
mod exposition;

pub use engine_metrics::EngineMetrics;
pub use exposition::render_prometheus;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn counters_increment() {
        let m = EngineMetrics::new();
        m.inc_ticks();
        m.inc_ticks();
        m.add_alerts_emitted(3);
        assert_eq!(m.ticks_val(), 2);
        assert_eq!(m.alerts_emitted_val(), 3);
    }

    #[test]
    fn latency_recording() {
        let m = EngineMetrics::new();
        let start = Instant::now();
        std::thread::sleep(std::time::Duration::from_millis(1));
        m.record_tick_latency(start);
        let (sum, count) = m.tick_latency_vals();
        assert!(sum > 0);
        assert_eq!(count, 1);
    }

    #[test]
    fn prometheus_output_contains_metric_names() {
        let m = EngineMetrics::new();
        m.inc_store_evictions();
        m.add_cooldown_suppressions(4);
        let output = render_prometheus(&m);
        assert!(output.contains("roomwatch_store_evictions_total 1"));
        assert!(output.contains("roomwatch_cooldown_suppressions_total 4"));
        assert!(output.contains("# TYPE roomwatch_tick_latency_us summary"));
    }
}
