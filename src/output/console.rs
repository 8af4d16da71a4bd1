//! Console progress reporting

use crate::output::ProgressReporter;
use crate::visit::VisitOutcome;
use async_trait::async_trait;

/// Reporter printing one status line per terminal outcome
pub struct ConsoleReporter {
    total: u64,
}

impl ConsoleReporter {
    /// Creates a reporter for a run of `total` visits
    pub fn new(total: u64) -> Self {
        Self { total }
    }
}

#[async_trait]
impl ProgressReporter for ConsoleReporter {
    async fn on_attempt_complete(&self, outcome: &VisitOutcome, success: u64, fail: u64) {
        let done = success + fail;

        match outcome {
            VisitOutcome::Success {
                status_code,
                elapsed,
            } => {
                tracing::info!(
                    "Visit ok (HTTP {}, {:.2}s) - {} ok, {} failed, {}/{} done",
                    status_code,
                    elapsed.as_secs_f64(),
                    success,
                    fail,
                    done,
                    self.total
                );
            }
            VisitOutcome::Failure { message, .. } => {
                tracing::warn!(
                    "Visit failed: {} - {} ok, {} failed, {}/{} done",
                    message,
                    success,
                    fail,
                    done,
                    self.total
                );
            }
        }
    }
}
