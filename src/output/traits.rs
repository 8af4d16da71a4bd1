//! Progress reporting traits
//!
//! The dispatcher surfaces one event per terminal visit outcome through the
//! `ProgressReporter` trait, so rendering (console lines, progress bars,
//! test probes) stays outside the scheduling core.

use crate::visit::VisitOutcome;
use async_trait::async_trait;

/// Receiver of per-visit progress events
///
/// `on_attempt_complete` is invoked exactly once per terminal outcome, with
/// the running totals at the time the outcome was recorded.
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    async fn on_attempt_complete(&self, outcome: &VisitOutcome, success: u64, fail: u64);
}

/// Reporter that discards all events
///
/// Used in tests and anywhere progress output is unwanted.
pub struct NullReporter;

#[async_trait]
impl ProgressReporter for NullReporter {
    async fn on_attempt_complete(&self, _outcome: &VisitOutcome, _success: u64, _fail: u64) {}
}
