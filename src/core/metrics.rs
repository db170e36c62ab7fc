//! Actor metrics for observability
//!
//! Counters describing what the actor did with the commands it dequeued,
//! including overflow trips and dropped snapshot requests.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use filtertag::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_written();
/// metrics.record_suppressed();
///
/// assert_eq!(metrics.lines_written(), 1);
/// assert_eq!(metrics.lines_suppressed(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Commands dequeued by the actor
    commands_processed: AtomicU64,

    /// Lines written to the output
    lines_written: AtomicU64,

    /// Lines rejected by the filter
    lines_suppressed: AtomicU64,

    /// Dequeue cycles that observed the backlog at or above the high-water mark
    overflow_events: AtomicU64,

    /// Snapshots sent back to a GetLogger caller
    snapshots_served: AtomicU64,

    /// GetLogger requests dropped (failed copy or caller gone)
    snapshots_dropped: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            commands_processed: AtomicU64::new(0),
            lines_written: AtomicU64::new(0),
            lines_suppressed: AtomicU64::new(0),
            overflow_events: AtomicU64::new(0),
            snapshots_served: AtomicU64::new(0),
            snapshots_dropped: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn commands_processed(&self) -> u64 {
        self.commands_processed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn lines_written(&self) -> u64 {
        self.lines_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn lines_suppressed(&self) -> u64 {
        self.lines_suppressed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn overflow_events(&self) -> u64 {
        self.overflow_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn snapshots_served(&self) -> u64 {
        self.snapshots_served.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn snapshots_dropped(&self) -> u64 {
        self.snapshots_dropped.load(Ordering::Relaxed)
    }

    /// Record a dequeued command, returning the previous count
    #[inline]
    pub fn record_command(&self) -> u64 {
        self.commands_processed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.lines_written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_suppressed(&self) -> u64 {
        self.lines_suppressed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_overflow(&self) -> u64 {
        self.overflow_events.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_snapshot_served(&self) -> u64 {
        self.snapshots_served.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_snapshot_dropped(&self) -> u64 {
        self.snapshots_dropped.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of emitted lines rejected by the filter, as a percentage
    ///
    /// Returns 0.0 if no lines have been processed.
    pub fn suppression_rate(&self) -> f64 {
        let suppressed = self.lines_suppressed() as f64;
        let total = self.lines_written() as f64 + suppressed;
        if total == 0.0 {
            0.0
        } else {
            (suppressed / total) * 100.0
        }
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
            commands_processed: AtomicU64::new(self.commands_processed()),
            lines_written: AtomicU64::new(self.lines_written()),
            lines_suppressed: AtomicU64::new(self.lines_suppressed()),
            overflow_events: AtomicU64::new(self.overflow_events()),
            snapshots_served: AtomicU64::new(self.snapshots_served()),
            snapshots_dropped: AtomicU64::new(self.snapshots_dropped()),
        }
    }
}
