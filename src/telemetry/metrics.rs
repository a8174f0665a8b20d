//! Prometheus metrics setup and metric definitions

use anyhow::{Context, Result};
use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return a handle for rendering metrics.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle> {
    // Gate requests are cheap; keep sub-millisecond resolution
    let buckets = [
        0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
    ];

    PrometheusBuilder::new()
        .set_buckets(&buckets)
        .context("failed to set histogram buckets")?
        .install_recorder()
        .context("failed to install Prometheus recorder")
}

/// Register metric descriptions so HELP/TYPE lines appear from startup.
pub fn describe_metrics() {
    describe_counter!(
        "portal_gate_contexts_resolved_total",
        "Domain contexts resolved, by tenant class and trust"
    );
    describe_counter!(
        "portal_gate_access_decisions_total",
        "Access decisions, by tenant class and outcome"
    );
    describe_counter!(
        "portal_gate_role_lookup_failures_total",
        "Role lookups that failed and were treated as anonymous"
    );
    describe_histogram!(
        "portal_gate_role_lookup_duration_seconds",
        "Role provider lookup duration in seconds"
    );
}
