//! Counters for monitoring a transfer session.
//!
//! # Example
//!
//! ```rust
//! use transferkit_interactive::metrics::SessionMetrics;
//!
//! let metrics = SessionMetrics::new();
//! metrics.record_frame_received(64);
//! metrics.record_event_emitted();
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.frames_received, 1);
//! assert_eq!(snapshot.events_emitted, 1);
//! ```

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Collected metrics for one session.
///
/// Thread-safe via atomic operations.
#[derive(Debug)]
pub struct SessionMetrics {
    // Inbound
    frames_received: AtomicU64,
    bytes_received: AtomicU64,
    foreign_frames: AtomicU64,
    decode_failures: AtomicU64,

    // Dispatch
    events_emitted: AtomicU64,
    transfers_discarded: AtomicU64,
    handler_failures: AtomicU64,

    // Signing replies
    replies_sent: AtomicU64,
    reply_failures: AtomicU64,
    replies_reused: AtomicU64,

    start_time: Instant,
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self {
            frames_received: AtomicU64::new(0),
            bytes_received: AtomicU64::new(0),
            foreign_frames: AtomicU64::new(0),
            decode_failures: AtomicU64::new(0),
            events_emitted: AtomicU64::new(0),
            transfers_discarded: AtomicU64::new(0),
            handler_failures: AtomicU64::new(0),
            replies_sent: AtomicU64::new(0),
            reply_failures: AtomicU64::new(0),
            replies_reused: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    // === Inbound ===

    /// Record a frame handed to the session.
    pub fn record_frame_received(&self, bytes: u64) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
        self.bytes_received.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record a frame rejected for arriving on another channel.
    pub fn record_foreign_frame(&self) {
        self.foreign_frames.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_decode_failure(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    // === Dispatch ===

    pub fn record_event_emitted(&self) {
        self.events_emitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a transfer update dropped because of its status.
    pub fn record_transfer_discarded(&self) {
        self.transfers_discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_handler_failure(&self) {
        self.handler_failures.fetch_add(1, Ordering::Relaxed);
    }

    // === Replies ===

    pub fn record_reply_sent(&self) {
        self.replies_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reply_failure(&self) {
        self.reply_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reply_reused(&self) {
        self.replies_reused.fetch_add(1, Ordering::Relaxed);
    }

    // === Snapshot ===

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs(),
            frames_received: self.frames_received.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            foreign_frames: self.foreign_frames.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
            events_emitted: self.events_emitted.load(Ordering::Relaxed),
            transfers_discarded: self.transfers_discarded.load(Ordering::Relaxed),
            handler_failures: self.handler_failures.load(Ordering::Relaxed),
            replies_sent: self.replies_sent.load(Ordering::Relaxed),
            reply_failures: self.reply_failures.load(Ordering::Relaxed),
            replies_reused: self.replies_reused.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.frames_received.store(0, Ordering::Relaxed);
        self.bytes_received.store(0, Ordering::Relaxed);
        self.foreign_frames.store(0, Ordering::Relaxed);
        self.decode_failures.store(0, Ordering::Relaxed);
        self.events_emitted.store(0, Ordering::Relaxed);
        self.transfers_discarded.store(0, Ordering::Relaxed);
        self.handler_failures.store(0, Ordering::Relaxed);
        self.replies_sent.store(0, Ordering::Relaxed);
        self.reply_failures.store(0, Ordering::Relaxed);
        self.replies_reused.store(0, Ordering::Relaxed);
    }
}

/// A point-in-time snapshot of all metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Seconds since the session was created.
    pub uptime_secs: u64,

    pub frames_received: u64,
    pub bytes_received: u64,
    pub foreign_frames: u64,
    pub decode_failures: u64,

    pub events_emitted: u64,
    pub transfers_discarded: u64,
    pub handler_failures: u64,

    pub replies_sent: u64,
    pub reply_failures: u64,
    pub replies_reused: u64,
}

impl MetricsSnapshot {
    /// Frames that produced no event for a protocol reason.
    pub fn frames_dropped(&self) -> u64 {
        self.foreign_frames + self.decode_failures + self.transfers_discarded
    }

    /// Format as JSON for logging/monitoring.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
