use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    // Pre-register counters so they appear even before the first increment.
    counter!("scan_cycles_total").absolute(0);
    counter!("scan_failures_total").absolute(0);
    counter!("live_refresh_total").absolute(0);
    counter!("live_refresh_skipped_total").absolute(0);

    gauge!("active_wallets").set(0.0);
    gauge!("inactive_wallets").set(0.0);
    gauge!("watched_wallets").set(0.0);

    // Histogram is lazily created on first record; force creation.
    histogram!("scan_duration_seconds").record(0.0);

    Ok(handle)
}

/// A handle backed by a recorder that is not installed globally, for tests
/// and tools that never scrape real metrics.
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}
