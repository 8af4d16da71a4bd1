//! Shared visit counter
//!
//! This module provides the thread-safe success/failure tally shared by all
//! workers, along with derived rate statistics for the final summary.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Thread-safe tally of visit outcomes
///
/// One counter exists per run and is shared across all workers behind an
/// `Arc`. Both fields only ever grow, and each update is a single atomic
/// read-modify-write, so readers never block writers for more than the
/// hardware operation itself. A snapshot may observe one field updated
/// without the other; cross-field atomicity is not required.
#[derive(Debug)]
pub struct VisitCounter {
    success: AtomicU64,
    fail: AtomicU64,
    started_at: Instant,
}

/// Point-in-time statistics derived from the counter
#[derive(Debug, Clone, Copy)]
pub struct CounterStats {
    pub success: u64,
    pub fail: u64,
    pub elapsed: Duration,
    pub visits_per_minute: f64,
}

impl VisitCounter {
    /// Creates a new counter, stamping the run start time
    pub fn new() -> Self {
        Self {
            success: AtomicU64::new(0),
            fail: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    /// Records one successful visit
    pub fn increment_success(&self) {
        self.success.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one failed visit
    pub fn increment_fail(&self) {
        self.fail.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a `(success, fail)` snapshot
    pub fn get_counts(&self) -> (u64, u64) {
        (
            self.success.load(Ordering::Relaxed),
            self.fail.load(Ordering::Relaxed),
        )
    }

    /// Time elapsed since the counter was created
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Returns counts plus the success rate per minute
    ///
    /// The rate is `success / elapsed_seconds * 60`, guarded so a
    /// zero-length run reports a rate of 0 instead of dividing by zero.
    pub fn get_stats(&self) -> CounterStats {
        let (success, fail) = self.get_counts();
        let elapsed = self.elapsed();
        let secs = elapsed.as_secs_f64();

        let visits_per_minute = if secs > 0.0 {
            success as f64 / secs * 60.0
        } else {
            0.0
        };

        CounterStats {
            success,
            fail,
            elapsed,
            visits_per_minute,
        }
    }
}

impl Default for VisitCounter {
    fn default() -> Self {
        Self::new()
    }
}
