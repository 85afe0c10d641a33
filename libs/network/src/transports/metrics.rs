//! Sink Send Metrics
//!
//! Lock-free counters updated from the drain loop, plus a small latency
//! summary behind a `parking_lot` lock that the hot path only ever try-locks.

use super::SinkMetrics;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Metrics tracker for datagram sends
#[derive(Clone, Default)]
pub struct MetricsTracker {
    datagrams_sent: Arc<AtomicU64>,
    bytes_sent: Arc<AtomicU64>,
    payload_bytes_sent: Arc<AtomicU64>,
    send_errors: Arc<AtomicU64>,
    eof_sentinels: Arc<AtomicU64>,

    latency: Arc<RwLock<LatencySummary>>,
    last_send: Arc<RwLock<Option<Instant>>>,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful data datagram send
    #[inline]
    pub fn record_send(&self, bytes: usize, payload_bytes: usize, latency_ns: u64) {
        self.datagrams_sent.fetch_add(1, Ordering::Release);
        self.bytes_sent.fetch_add(bytes as u64, Ordering::Release);
        self.payload_bytes_sent
            .fetch_add(payload_bytes as u64, Ordering::Release);

        // Skip the sample rather than wait on a reader
        if let Some(mut latency) = self.latency.try_write() {
            latency.record(latency_ns);
        }

        *self.last_send.write() = Some(Instant::now());
    }

    /// Record a datagram lost to a send failure
    #[inline]
    pub fn record_error(&self) {
        self.send_errors.fetch_add(1, Ordering::Release);
    }

    /// Record a zero-length end-of-stream datagram
    pub fn record_sentinel(&self) {
        self.eof_sentinels.fetch_add(1, Ordering::Release);
        *self.last_send.write() = Some(Instant::now());
    }

    pub fn snapshot(&self) -> SinkMetrics {
        let latency = self.latency.read();

        SinkMetrics {
            datagrams_sent: self.datagrams_sent.load(Ordering::Acquire),
            bytes_sent: self.bytes_sent.load(Ordering::Acquire),
            payload_bytes_sent: self.payload_bytes_sent.load(Ordering::Acquire),
            send_errors: self.send_errors.load(Ordering::Acquire),
            eof_sentinels: self.eof_sentinels.load(Ordering::Acquire),
            last_send_latency_ns: latency.last,
            avg_send_latency_ns: latency.average(),
            max_send_latency_ns: latency.max,
            last_activity: *self.last_send.read(),
        }
    }
}

/// Running latency summary
#[derive(Default)]
struct LatencySummary {
    count: u64,
    sum: u64,
    last: u64,
    max: u64,
}

impl LatencySummary {
    fn record(&mut self, latency_ns: u64) {
        self.count += 1;
        self.sum = self.sum.saturating_add(latency_ns);
        self.last = latency_ns;
        self.max = self.max.max(latency_ns);
    }

    fn average(&self) -> u64 {
        if self.count > 0 {
            self.sum / self.count
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = MetricsTracker::new();
        metrics.record_send(16, 12, 1_000);
        metrics.record_send(10, 6, 3_000);
        metrics.record_error();
        metrics.record_sentinel();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.datagrams_sent, 2);
        assert_eq!(snapshot.bytes_sent, 26);
        assert_eq!(snapshot.payload_bytes_sent, 18);
        assert_eq!(snapshot.send_errors, 1);
        assert_eq!(snapshot.eof_sentinels, 1);
        assert_eq!(snapshot.last_send_latency_ns, 3_000);
        assert_eq!(snapshot.avg_send_latency_ns, 2_000);
        assert_eq!(snapshot.max_send_latency_ns, 3_000);
        assert!(snapshot.last_activity.is_some());
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = MetricsTracker::new();
        let clone = metrics.clone();
        clone.record_error();
        assert_eq!(metrics.snapshot().send_errors, 1);
    }

    #[test]
    fn test_empty_snapshot() {
        assert_eq!(MetricsTracker::new().snapshot(), SinkMetrics::default());
    }
}
