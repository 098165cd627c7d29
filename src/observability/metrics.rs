//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define bot metrics (transactions, skipped steps, rewards requests)
//! - Expose Prometheus-compatible metrics endpoint when enabled
//!
//! # Metrics
//! - `bot_transactions_total` (counter): submitted transactions by action, status
//! - `bot_steps_skipped_total` (counter): skipped steps by action, reason
//! - `bot_rewards_requests_total` (counter): rewards API calls by endpoint, status
//!
//! # Design Decisions
//! - Recording without an installed exporter is a no-op, so tests need no setup
//! - Labels are static strings to keep cardinality fixed

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to start metrics endpoint"),
    }
}

fn status_label(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "error"
    }
}

/// Record a submitted transaction.
pub fn record_transaction(action: &'static str, ok: bool) {
    metrics::counter!("bot_transactions_total", "action" => action, "status" => status_label(ok)).increment(1);
}

/// Record a step that was skipped before submission.
pub fn record_step_skipped(action: &'static str, reason: &'static str) {
    metrics::counter!("bot_steps_skipped_total", "action" => action, "reason" => reason).increment(1);
}

/// Record a rewards API request.
pub fn record_rewards_request(endpoint: &'static str, ok: bool) {
    metrics::counter!("bot_rewards_requests_total", "endpoint" => endpoint, "status" => status_label(ok))
        .increment(1);
}
