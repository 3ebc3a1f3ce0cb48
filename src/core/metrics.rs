//! Logger metrics for observability
//!
//! Per-logger counters for messages queued, processed, suppressed by level
//! gating, rejected after disposal, and failures on the sink and broadcast
//! side.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use relay_log::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_enqueued();
/// metrics.record_processed();
///
/// assert_eq!(metrics.enqueued(), 1);
/// assert_eq!(metrics.pending(), 0);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Messages placed on the queue
    enqueued: AtomicU64,

    /// Messages taken off the queue and delivered
    processed: AtomicU64,

    /// Calls dropped because their level was disabled
    suppressed: AtomicU64,

    /// Calls dropped because the logger was disposed
    rejected_after_dispose: AtomicU64,

    /// Appender errors and panics
    sink_failures: AtomicU64,

    /// Broadcast subscriber panics
    subscriber_failures: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            processed: AtomicU64::new(0),
            suppressed: AtomicU64::new(0),
            rejected_after_dispose: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
            subscriber_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn suppressed(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn rejected_after_dispose(&self) -> u64 {
        self.rejected_after_dispose.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn subscriber_failures(&self) -> u64 {
        self.subscriber_failures.load(Ordering::Relaxed)
    }

    /// Messages queued but not yet processed
    pub fn pending(&self) -> u64 {
        self.enqueued().saturating_sub(self.processed())
    }

    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_processed(&self) -> u64 {
        self.processed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_suppressed(&self) -> u64 {
        self.suppressed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_rejected(&self) -> u64 {
        self.rejected_after_dispose.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_subscriber_failures(&self, count: u64) -> u64 {
        self.subscriber_failures.fetch_add(count, Ordering::Relaxed)
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.enqueued.store(0, Ordering::Relaxed);
        self.processed.store(0, Ordering::Relaxed);
        self.suppressed.store(0, Ordering::Relaxed);
        self.rejected_after_dispose.store(0, Ordering::Relaxed);
        self.sink_failures.store(0, Ordering::Relaxed);
        self.subscriber_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            enqueued: AtomicU64::new(self.enqueued()),
            processed: AtomicU64::new(self.processed()),
            suppressed: AtomicU64::new(self.suppressed()),
            rejected_after_dispose: AtomicU64::new(self.rejected_after_dispose()),
            sink_failures: AtomicU64::new(self.sink_failures()),
            subscriber_failures: AtomicU64::new(self.subscriber_failures()),
        }
    }
}
