//! Prometheus metrics for the relay.
//!
//! - Webhook metrics (received by topic, rejected by reason)
//! - Render metrics (message text composed or skipped)
//! - Forward metrics (outcome and latency of calls to Wylto)
//! - Connection metrics (link calls to Wylto)

mod helpers;

pub use helpers::{
    encode_metrics, ConnectionMetrics, ForwardMetrics, RenderMetrics, WebhookMetrics,
};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter_vec, register_int_gauge, Histogram, IntCounterVec,
    IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "wylto";

lazy_static! {
    // ============================================================================
    // Webhook Metrics
    // ============================================================================

    /// Verified webhooks by Shopify topic
    pub static ref WEBHOOKS_RECEIVED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_webhooks_received_total", METRIC_PREFIX),
        "Total verified Shopify webhooks received",
        &["topic"]
    ).unwrap();

    /// Rejected webhooks by reason
    pub static ref WEBHOOKS_REJECTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_webhooks_rejected_total", METRIC_PREFIX),
        "Total Shopify webhooks rejected before relaying",
        &["reason"]
    ).unwrap();

    // ============================================================================
    // Render Metrics
    // ============================================================================

    /// Message renders by outcome (rendered, missing_fields, not_found)
    pub static ref RENDERS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_renders_total", METRIC_PREFIX),
        "Total message template renders",
        &["outcome"]
    ).unwrap();

    // ============================================================================
    // Forward Metrics
    // ============================================================================

    /// Forwards by outcome (delivered, failed)
    pub static ref FORWARDS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_forwards_total", METRIC_PREFIX),
        "Total events forwarded to Wylto",
        &["outcome"]
    ).unwrap();

    /// Forward retries
    pub static ref FORWARD_RETRIES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_forward_retries_total", METRIC_PREFIX),
        "Total forward attempts retried",
        &["reason"]
    ).unwrap();

    /// End-to-end forward latency including retries
    pub static ref FORWARD_LATENCY: Histogram = register_histogram!(
        format!("{}_forward_latency_seconds", METRIC_PREFIX),
        "Latency of forwarding an event to Wylto",
        vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    ).unwrap();

    // ============================================================================
    // Connection Metrics
    // ============================================================================

    /// Calls to the Wylto account API by operation and outcome
    pub static ref CONNECTION_CALLS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_connection_calls_total", METRIC_PREFIX),
        "Total calls to the Wylto account API",
        &["operation", "outcome"]
    ).unwrap();

    /// Shops currently linked to a Wylto account
    pub static ref SHOPS_CONNECTED: IntGauge = register_int_gauge!(
        format!("{}_shops_connected", METRIC_PREFIX),
        "Number of shops known to be linked to Wylto"
    ).unwrap();
}
