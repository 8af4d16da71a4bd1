//! Visit operation
//!
//! This module defines the injected "perform one visit" capability the
//! dispatch core schedules, together with the outcome and error taxonomy the
//! retry policy reasons about, and the production HTTP implementation.

mod http;
mod useragent;

pub use http::{build_http_client, HttpVisitor, HttpVisitorFactory};
pub use useragent::UserAgentPool;

use crate::RevisitError;
use async_trait::async_trait;
use std::time::Duration;

/// Error classification for a failed visit attempt
///
/// The retry policy escalates backoff for transient network and TLS faults,
/// and moves on quickly for everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// The attempt exceeded its time budget
    Timeout,

    /// Connection refused/reset or TLS handshake failure
    ConnectionOrHandshake,

    /// Any other fault, including resource acquisition errors
    Other,
}

/// Result of one visit attempt
#[derive(Debug, Clone)]
pub enum VisitOutcome {
    /// The visit completed
    Success {
        /// HTTP status code (or equivalent) of the final response
        status_code: u16,
        /// Wall time the attempt took
        elapsed: Duration,
    },

    /// The visit failed
    Failure {
        /// Error classification used by the retry policy
        class: ErrorClass,
        /// Human-readable error description
        message: String,
    },
}

impl VisitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, VisitOutcome::Success { .. })
    }

    /// The error class of a failure, if this outcome is one
    pub fn error_class(&self) -> Option<ErrorClass> {
        match self {
            VisitOutcome::Success { .. } => None,
            VisitOutcome::Failure { class, .. } => Some(*class),
        }
    }
}

/// One visit capability, owned by a single worker
///
/// Attempts within a worker run strictly sequentially, so implementations may
/// keep per-session mutable state (cookies, connection pools) without
/// internal locking. That state must never be shared across workers.
#[async_trait]
pub trait Visitor: Send {
    /// Performs one visit attempt
    ///
    /// Never returns an error: every fault is folded into a classified
    /// [`VisitOutcome::Failure`]. Implementations bound their own duration.
    async fn visit(&mut self) -> VisitOutcome;

    /// Resets per-visit session state between sequential visits
    ///
    /// Cheap by contract; called between visits, not after the last one.
    fn reset(&mut self) {}

    /// Releases resources owned by this visitor
    ///
    /// Called exactly once when the owning worker finishes its quota.
    /// Implementations log and swallow release faults.
    async fn close(&mut self) {}
}

/// Factory producing one visitor per worker
///
/// Per-worker construction is what partitions connection pools and session
/// state; it is a correctness requirement, not an optimization.
#[async_trait]
pub trait VisitorFactory: Send + Sync {
    async fn create(&self, worker_index: usize) -> Result<Box<dyn Visitor>, RevisitError>;
}
