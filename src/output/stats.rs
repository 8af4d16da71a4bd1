//! Run summary generation and display

use crate::counter::CounterStats;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Final statistics for one run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Number of visits the run was asked to perform
    pub requested: u64,

    /// Visits that completed successfully
    pub success: u64,

    /// Visits that exhausted their retries
    pub fail: u64,

    /// Wall time from run start to the last worker joining
    pub elapsed: Duration,

    /// Successful visits per minute
    pub visits_per_minute: f64,

    /// Whether the run was cut short by external cancellation
    pub interrupted: bool,

    /// When the summary was produced
    pub finished_at: DateTime<Utc>,
}

impl RunSummary {
    /// Builds a summary from the counter's final statistics
    pub fn from_stats(requested: u64, stats: CounterStats, interrupted: bool) -> Self {
        Self {
            requested,
            success: stats.success,
            fail: stats.fail,
            elapsed: stats.elapsed,
            visits_per_minute: stats.visits_per_minute,
            interrupted,
            finished_at: Utc::now(),
        }
    }

    /// Fraction of processed visits that succeeded, as a percentage
    pub fn success_rate(&self) -> f64 {
        let processed = self.success + self.fail;
        if processed > 0 {
            self.success as f64 / processed as f64 * 100.0
        } else {
            0.0
        }
    }
}

/// Prints the run summary to stdout in a formatted manner
///
/// # Arguments
///
/// * `summary` - The summary to display
pub fn print_summary(summary: &RunSummary) {
    println!("=== Visit Statistics ===\n");

    if summary.interrupted {
        println!("Run interrupted - totals below cover completed visits only\n");
    }

    println!("Requested: {}", summary.requested);
    println!("Successful: {}", summary.success);
    println!("Failed: {}", summary.fail);
    println!("Elapsed: {:.1}s", summary.elapsed.as_secs_f64());
    println!("Rate: {:.1} visits/minute", summary.visits_per_minute);
    println!("Success rate: {:.1}%", summary.success_rate());
    println!(
        "Finished at: {}",
        summary.finished_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
}
