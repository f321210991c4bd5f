//! Metrics helper structs for convenient metric recording

use std::time::Duration;

use prometheus::{Encoder, TextEncoder};

use super::{
    CONNECTION_CALLS_TOTAL, FORWARDS_TOTAL, FORWARD_LATENCY, FORWARD_RETRIES_TOTAL,
    RENDERS_TOTAL, SHOPS_CONNECTED, WEBHOOKS_RECEIVED_TOTAL, WEBHOOKS_REJECTED_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording webhook metrics
pub struct WebhookMetrics;

impl WebhookMetrics {
    pub fn record_received(topic: &str) {
        WEBHOOKS_RECEIVED_TOTAL.with_label_values(&[topic]).inc();
    }

    /// Record a webhook rejected for `reason` (e.g. "signature", "malformed")
    pub fn record_rejected(reason: &str) {
        WEBHOOKS_REJECTED_TOTAL.with_label_values(&[reason]).inc();
    }
}

/// Helper struct for recording render metrics
pub struct RenderMetrics;

impl RenderMetrics {
    pub fn record_rendered() {
        RENDERS_TOTAL.with_label_values(&["rendered"]).inc();
    }

    pub fn record_failed(outcome: &str) {
        RENDERS_TOTAL.with_label_values(&[outcome]).inc();
    }
}

/// Helper struct for recording forward metrics
pub struct ForwardMetrics;

impl ForwardMetrics {
    pub fn record_delivered(latency: Duration) {
        FORWARDS_TOTAL.with_label_values(&["delivered"]).inc();
        FORWARD_LATENCY.observe(latency.as_secs_f64());
    }

    pub fn record_failed(latency: Duration) {
        FORWARDS_TOTAL.with_label_values(&["failed"]).inc();
        FORWARD_LATENCY.observe(latency.as_secs_f64());
    }

    pub fn record_retry(reason: &str) {
        FORWARD_RETRIES_TOTAL.with_label_values(&[reason]).inc();
    }
}

/// Helper struct for recording connection metrics
pub struct ConnectionMetrics;

impl ConnectionMetrics {
    pub fn record_call(operation: &str, success: bool) {
        let outcome = if success { "ok" } else { "error" };
        CONNECTION_CALLS_TOTAL
            .with_label_values(&[operation, outcome])
            .inc();
    }

    pub fn set_shops_connected(count: usize) {
        SHOPS_CONNECTED.set(count as i64);
    }
}
