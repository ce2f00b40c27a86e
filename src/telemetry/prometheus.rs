use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus HTTP exporter on `port`.
/// After this call, any metrics recorded via the `metrics` crate
/// macros (counter!, histogram!) are exported at /metrics.
pub fn init_metrics_server(port: u16) -> anyhow::Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()?;
    Ok(())
}

// ── Fetch cycle metrics ─────────────────────────────────────────

pub fn record_cycle_success(duration_ms: f64) {
    counter!("fetch_cycles_total", "outcome" => "ok").increment(1);
    histogram!("fetch_cycle_duration_ms").record(duration_ms);
}

pub fn record_cycle_failure(kind: &'static str, endpoint: &'static str) {
    counter!("fetch_cycles_total", "outcome" => "error", "kind" => kind, "endpoint" => endpoint)
        .increment(1);
}

/// A tick fired while the previous cycle was still in flight.
pub fn record_tick_skipped() {
    counter!("fetch_ticks_skipped_total").increment(1);
}

/// Cycle finished but lost to a newer snapshot, or arrived after stop.
pub fn record_snapshot_discarded(reason: &'static str) {
    counter!("snapshots_discarded_total", "reason" => reason).increment(1);
}

// ── View metrics ────────────────────────────────────────────────

pub fn record_chart_mounted() {
    gauge!("chart_widgets_mounted").increment(1.0);
}

pub fn record_chart_released() {
    gauge!("chart_widgets_mounted").decrement(1.0);
}

pub fn record_frame_rendered() {
    counter!("frames_rendered_total").increment(1);
}
