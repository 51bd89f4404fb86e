// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade so any recorder (Prometheus, statsd, etc.)
//! can collect these metrics.

use metrics::{describe_counter, describe_histogram};

/// Register all Finsage metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "finsage_provider_attempts_total",
        "Provider invocation attempts"
    );
    describe_counter!(
        "finsage_provider_failures_total",
        "Provider invocation failures by error kind"
    );
    describe_counter!(
        "finsage_chain_exhausted_total",
        "Requests for which every candidate provider failed"
    );
    describe_counter!(
        "finsage_clarifications_total",
        "Requests answered with clarifying questions instead of a model call"
    );
    describe_histogram!(
        "finsage_request_latency_seconds",
        "End-to-end orchestration latency in seconds"
    );
}

/// Install a Prometheus recorder listening on the default scrape endpoint.
///
/// Returns an error string when a recorder is already installed.
pub fn install_prometheus_recorder() -> Result<(), String> {
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .install()
        .map_err(|e| format!("failed to install Prometheus recorder: {e}"))
}

/// Record one provider invocation attempt.
pub fn record_attempt(provider: &str) {
    metrics::counter!("finsage_provider_attempts_total", "provider" => provider.to_string())
        .increment(1);
}

/// Record one provider failure with its classified kind.
pub fn record_failure(provider: &str, kind: &str) {
    metrics::counter!(
        "finsage_provider_failures_total",
        "provider" => provider.to_string(),
        "kind" => kind.to_string()
    )
    .increment(1);
}

/// Record a fully exhausted fallback chain.
pub fn record_chain_exhausted() {
    metrics::counter!("finsage_chain_exhausted_total").increment(1);
}

/// Record a clarify-first terminal outcome.
pub fn record_clarification() {
    metrics::counter!("finsage_clarifications_total").increment(1);
}

/// Record end-to-end request latency.
pub fn record_latency(seconds: f64) {
    metrics::histogram!("finsage_request_latency_seconds").record(seconds);
}
