//! Relay counters

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Lifetime counters for the relay
#[derive(Debug, Default)]
pub struct RelayStats {
    webhooks_received: AtomicU64,
    webhooks_rejected: AtomicU64,
    messages_rendered: AtomicU64,
    render_failures: AtomicU64,
    forwards_delivered: AtomicU64,
    forwards_failed: AtomicU64,
}

/// Point-in-time copy of [`RelayStats`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelayStatsSnapshot {
    pub webhooks_received: u64,
    pub webhooks_rejected: u64,
    pub messages_rendered: u64,
    pub render_failures: u64,
    pub forwards_delivered: u64,
    pub forwards_failed: u64,
}

impl RelayStats {
    pub fn record_received(&self) {
        self.webhooks_received.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.webhooks_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rendered(&self) {
        self.messages_rendered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_render_failed(&self) {
        self.render_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_forwarded(&self) {
        self.forwards_delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_forward_failed(&self) {
        self.forwards_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RelayStatsSnapshot {
        RelayStatsSnapshot {
            webhooks_received: self.webhooks_received.load(Ordering::Relaxed),
            webhooks_rejected: self.webhooks_rejected.load(Ordering::Relaxed),
            messages_rendered: self.messages_rendered.load(Ordering::Relaxed),
            render_failures: self.render_failures.load(Ordering::Relaxed),
            forwards_delivered: self.forwards_delivered.load(Ordering::Relaxed),
            forwards_failed: self.forwards_failed.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counters() {
        let stats = RelayStats::default();
        stats.record_received();
        stats.record_received();
        stats.record_rejected();
        stats.record_forward_failed();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.webhooks_received, 2);
        assert_eq!(snapshot.webhooks_rejected, 1);
        assert_eq!(snapshot.forwards_failed, 1);
        assert_eq!(snapshot.forwards_delivered, 0);
    }
}
