//! WebSocket metrics tracking
//!
//! Counters surfaced through `/api/status`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Counters {
    total_connections: AtomicU64,
    active_connections: AtomicU64,
    rejected_connections: AtomicU64,
    messages_sent: AtomicU64,
    messages_received: AtomicU64,
    bytes_sent: AtomicU64,
    bytes_received: AtomicU64,
    /// Broadcast events a slow client never saw
    events_skipped: AtomicU64,
    error_count: AtomicU64,
}

/// Shared WebSocket metrics
#[derive(Debug, Clone, Default)]
pub struct WebSocketMetrics {
    counters: Arc<Counters>,
}

impl WebSocketMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_connection(&self) {
        self.counters.total_connections.fetch_add(1, Ordering::Relaxed);
        self.counters.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejection(&self) {
        self.counters.rejected_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_disconnection(&self) {
        let _ = self.counters.active_connections.fetch_update(
            Ordering::Relaxed,
            Ordering::Relaxed,
            |current| current.checked_sub(1),
        );
    }

    pub fn record_message_sent(&self, bytes: u64) {
        self.counters.messages_sent.fetch_add(1, Ordering::Relaxed);
        self.counters.bytes_sent.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn record_message_received(&self, bytes: u64) {
        self.counters.messages_received.fetch_add(1, Ordering::Relaxed);
        self.counters.bytes_received.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn record_skipped(&self, events: u64) {
        self.counters.events_skipped.fetch_add(events, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.counters.error_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        let c = &self.counters;
        MetricsSnapshot {
            total_connections: c.total_connections.load(Ordering::Relaxed),
            active_connections: c.active_connections.load(Ordering::Relaxed),
            rejected_connections: c.rejected_connections.load(Ordering::Relaxed),
            messages_sent: c.messages_sent.load(Ordering::Relaxed),
            messages_received: c.messages_received.load(Ordering::Relaxed),
            bytes_sent: c.bytes_sent.load(Ordering::Relaxed),
            bytes_received: c.bytes_received.load(Ordering::Relaxed),
            events_skipped: c.events_skipped.load(Ordering::Relaxed),
            error_count: c.error_count.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot for a point in time
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MetricsSnapshot {
    pub total_connections: u64,
    pub active_connections: u64,
    pub rejected_connections: u64,
    pub messages_sent: u64,
    pub messages_received: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub events_skipped: u64,
    pub error_count: u64,
}

impl MetricsSnapshot {
    /// Average size of an outgoing message in bytes
    pub fn avg_message_size_sent(&self) -> f64 {
        if self.messages_sent > 0 {
            self.bytes_sent as f64 / self.messages_sent as f64
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_counts() {
        let metrics = WebSocketMetrics::new();
        metrics.record_connection();
        metrics.record_connection();
        metrics.record_disconnection();
        metrics.record_rejection();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_connections, 2);
        assert_eq!(snapshot.active_connections, 1);
        assert_eq!(snapshot.rejected_connections, 1);
    }

    #[test]
    fn test_disconnection_never_underflows() {
        let metrics = WebSocketMetrics::new();
        metrics.record_disconnection();
        assert_eq!(metrics.snapshot().active_connections, 0);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = WebSocketMetrics::new();
        let clone = metrics.clone();
        clone.record_message_sent(100);
        clone.record_message_sent(300);
        metrics.record_message_received(50);
        metrics.record_skipped(4);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.messages_sent, 2);
        assert_eq!(snapshot.bytes_received, 50);
        assert_eq!(snapshot.events_skipped, 4);
        assert!((snapshot.avg_message_size_sent() - 200.0).abs() < f64::EPSILON);
    }
}
