use metrics::{counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub const TRADES_CREATED: &str = "trades_created_total";
pub const TRADE_CREATE_REJECTED: &str = "trade_create_rejected_total";
pub const TRADE_CREATE_FAILED: &str = "trade_create_failed_total";
pub const TRADE_LIST_REQUESTS: &str = "trade_list_requests_total";
pub const TRADES_STORED: &str = "trades_stored";

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    // Pre-register so they appear even before the first increment.
    counter!(TRADES_CREATED).absolute(0);
    counter!(TRADE_CREATE_REJECTED).absolute(0);
    counter!(TRADE_CREATE_FAILED).absolute(0);
    counter!(TRADE_LIST_REQUESTS).absolute(0);
    gauge!(TRADES_STORED).set(0.0);

    Ok(handle)
}

/// Handle backed by a recorder that is not installed globally.
/// Lets tests build several routers in one process.
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}
