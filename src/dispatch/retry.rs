//! Retry policy with error-class-aware backoff
//!
//! This module wraps one visit in a bounded retry loop:
//! - Attempts are gated on the resource monitor's pause flag
//! - Transient network/TLS failures back off with escalating waits
//! - Other failures retry after a short fixed delay
//! - Exactly one terminal outcome is recorded per visit

use crate::counter::VisitCounter;
use crate::dispatch::ShutdownToken;
use crate::monitor::PauseSignal;
use crate::visit::{ErrorClass, VisitOutcome, Visitor};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// Delay before retrying an unclassified failure
///
/// Logic errors won't self-heal, so there is no point backing off; the short
/// delay only keeps a hot failure loop from spinning.
const OTHER_RETRY_DELAY_MS: u64 = 100;

/// Transient record of one scheduled retry, surfaced in log fields
#[derive(Debug)]
struct RetryAttempt {
    attempt_number: u32,
    error_class: ErrorClass,
    wait_before_next: Duration,
}

/// Computes the backoff wait for a failed attempt
///
/// Transient network and TLS failures wait `uniform(1,3) * (attempt_index + 1)`
/// seconds so an unstable server gets room to recover; everything else uses
/// the short fixed delay.
pub fn backoff_delay(class: ErrorClass, attempt_index: u32) -> Duration {
    let factor = rand::thread_rng().gen_range(1.0..3.0);
    backoff_delay_with_factor(class, attempt_index, factor)
}

/// Backoff as a pure function of `(error_class, attempt_index, factor)`
///
/// `backoff_delay` samples the factor uniformly from [1, 3); this variant
/// exists so the escalation schedule is testable without randomness.
pub fn backoff_delay_with_factor(class: ErrorClass, attempt_index: u32, factor: f64) -> Duration {
    match class {
        ErrorClass::Timeout | ErrorClass::ConnectionOrHandshake => {
            Duration::from_secs_f64(factor * f64::from(attempt_index + 1))
        }
        ErrorClass::Other => Duration::from_millis(OTHER_RETRY_DELAY_MS),
    }
}

/// Bounded retry wrapper around a visit capability
#[derive(Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    pause: Arc<PauseSignal>,
    pause_poll: Duration,
}

impl RetryPolicy {
    /// Creates a retry policy
    ///
    /// # Arguments
    ///
    /// * `max_retries` - Maximum attempts per visit, first try included
    /// * `pause` - Pause flag published by the resource monitor
    /// * `pause_poll` - How often a gated attempt re-checks the flag
    pub fn new(max_retries: u32, pause: Arc<PauseSignal>, pause_poll: Duration) -> Self {
        Self {
            max_retries,
            pause,
            pause_poll,
        }
    }

    /// Runs one visit to a terminal outcome
    ///
    /// Performs at most `max_retries` attempts, sleeping while the resource
    /// monitor signals pause and between failed attempts per
    /// [`backoff_delay`]. Exactly one terminal outcome is recorded in the
    /// counter - retries never double-count.
    ///
    /// # Returns
    ///
    /// * `Some(outcome)` - The recorded terminal outcome
    /// * `None` - The run was cancelled before any attempt completed;
    ///   nothing was recorded
    pub async fn execute_with_retry(
        &self,
        visitor: &mut dyn Visitor,
        counter: &VisitCounter,
        shutdown: &mut ShutdownToken,
    ) -> Option<VisitOutcome> {
        let attempts = self.max_retries.max(1);
        // Most recent failure, recorded as terminal if cancellation lands
        // while waiting to retry it
        let mut pending: Option<(ErrorClass, String)> = None;
        let mut attempt = 0;

        loop {
            // Gate on resource pressure, re-checking on the poll cadence
            while self.pause.should_pause() {
                tracing::debug!("Host under pressure, visit attempt waiting");
                let cancelled = tokio::select! {
                    _ = tokio::time::sleep(self.pause_poll) => false,
                    _ = shutdown.wait() => true,
                };
                if cancelled {
                    return self.abandon(pending, counter);
                }
            }

            if shutdown.is_shutdown() {
                return self.abandon(pending, counter);
            }

            match visitor.visit().await {
                VisitOutcome::Success {
                    status_code,
                    elapsed,
                } => {
                    counter.increment_success();
                    return Some(VisitOutcome::Success {
                        status_code,
                        elapsed,
                    });
                }

                VisitOutcome::Failure { class, message } => {
                    if attempt + 1 == attempts {
                        counter.increment_fail();
                        tracing::warn!(
                            "Visit failed after {} attempts: {}",
                            attempts,
                            message
                        );
                        return Some(VisitOutcome::Failure { class, message });
                    }

                    let retry = RetryAttempt {
                        attempt_number: attempt + 1,
                        error_class: class,
                        wait_before_next: backoff_delay(class, attempt),
                    };
                    tracing::info!(
                        attempt = retry.attempt_number,
                        error_class = ?retry.error_class,
                        wait_ms = retry.wait_before_next.as_millis() as u64,
                        "Visit failed, retrying: {}",
                        message
                    );

                    let cancelled = tokio::select! {
                        _ = tokio::time::sleep(retry.wait_before_next) => false,
                        _ = shutdown.wait() => true,
                    };
                    pending = Some((class, message));
                    if cancelled {
                        return self.abandon(pending, counter);
                    }

                    attempt += 1;
                }
            }
        }
    }

    /// Resolves a cancelled visit
    ///
    /// A visit that already failed at least once is recorded as that failure;
    /// one that never completed an attempt is abandoned unrecorded.
    fn abandon(
        &self,
        pending: Option<(ErrorClass, String)>,
        counter: &VisitCounter,
    ) -> Option<VisitOutcome> {
        match pending {
            Some((class, message)) => {
                counter.increment_fail();
                tracing::debug!("Cancelled while awaiting retry, recording failure");
                Some(VisitOutcome::Failure { class, message })
            }
            None => None,
        }
    }
}
