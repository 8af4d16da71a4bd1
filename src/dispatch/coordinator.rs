//! Dispatcher - worker pool orchestration
//!
//! This module contains the run loop that coordinates a whole visit run:
//! - Partitioning the total count into per-worker quotas
//! - Starting and stopping the resource monitor with the run
//! - Spawning one task per non-empty quota
//! - Draining in-flight workers on completion or cancellation
//! - Producing the final summary from the shared counter

use crate::config::Config;
use crate::counter::VisitCounter;
use crate::dispatch::partition::partition;
use crate::dispatch::retry::RetryPolicy;
use crate::dispatch::shutdown::{shutdown_channel, ShutdownToken};
use crate::dispatch::WorkerQuota;
use crate::monitor::{CpuSampler, ResourceMonitor};
use crate::output::{ProgressReporter, RunSummary};
use crate::visit::{ErrorClass, VisitOutcome, VisitorFactory};
use std::sync::Arc;
use std::time::Duration;

/// Lifecycle of one dispatch run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Idle,
    Running,
    Draining,
    Completed,
}

fn transition(state: &mut RunState, to: RunState) {
    tracing::debug!("Run state: {:?} -> {:?}", *state, to);
    *state = to;
}

/// Orchestrates one visit run over an injected visit capability
pub struct Dispatcher {
    config: Config,
    factory: Arc<dyn VisitorFactory>,
    reporter: Arc<dyn ProgressReporter>,
    sampler: Arc<dyn CpuSampler>,
}

impl Dispatcher {
    /// Creates a new dispatcher
    ///
    /// # Arguments
    ///
    /// * `config` - The validated run configuration
    /// * `factory` - Produces one visit session per worker
    /// * `reporter` - Receives one event per terminal outcome
    /// * `sampler` - CPU utilization source for the resource monitor
    pub fn new(
        config: Config,
        factory: Arc<dyn VisitorFactory>,
        reporter: Arc<dyn ProgressReporter>,
        sampler: Arc<dyn CpuSampler>,
    ) -> Self {
        Self {
            config,
            factory,
            reporter,
            sampler,
        }
    }

    /// Runs the visit plan to completion
    ///
    /// Individual visit failures are data, not errors, so the run itself
    /// cannot fail: a summary is always produced, including after external
    /// cancellation through `shutdown`.
    pub async fn run(&self, shutdown: ShutdownToken) -> RunSummary {
        let total = self.config.visit.total_visits;
        let mut state = RunState::Idle;

        let counter = Arc::new(VisitCounter::new());

        // The monitor lives exactly as long as the run
        let (monitor_stop, monitor_token) = shutdown_channel();
        let monitor = ResourceMonitor::start(
            Arc::clone(&self.sampler),
            &self.config.throttle,
            monitor_token,
        );

        let policy = RetryPolicy::new(
            self.config.visit.max_retries,
            monitor.signal(),
            Duration::from_millis(self.config.throttle.pause_poll_ms),
        );

        let quotas = partition(total, self.config.visit.workers);
        let active = quotas.iter().filter(|q| q.assigned_count > 0).count();

        transition(&mut state, RunState::Running);
        tracing::info!("Dispatching {} visits across {} workers", total, active);

        let mut handles = Vec::with_capacity(active);
        for quota in quotas.into_iter().filter(|q| q.assigned_count > 0) {
            handles.push(tokio::spawn(run_worker(
                quota,
                Arc::clone(&self.factory),
                policy.clone(),
                Arc::clone(&counter),
                Arc::clone(&self.reporter),
                shutdown.clone(),
            )));
        }

        let join_all = async {
            for handle in handles {
                if let Err(e) = handle.await {
                    // A panicking worker loses its remaining quota, never the run
                    tracing::error!("Worker task ended abnormally: {}", e);
                }
            }
        };
        tokio::pin!(join_all);

        let mut cancel = shutdown.clone();
        let interrupted = tokio::select! {
            _ = &mut join_all => false,
            _ = cancel.wait() => true,
        };

        transition(&mut state, RunState::Draining);
        if interrupted {
            tracing::info!("Cancellation received, draining in-flight workers");
            join_all.await;
        }

        monitor_stop.shutdown();
        monitor.stop().await;

        transition(&mut state, RunState::Completed);
        let stats = counter.get_stats();
        tracing::info!(
            "Run completed: {} succeeded, {} failed in {:.1}s",
            stats.success,
            stats.fail,
            stats.elapsed.as_secs_f64()
        );

        RunSummary::from_stats(total, stats, interrupted)
    }
}

/// One worker draining its quota sequentially
///
/// The worker owns its visitor for its whole lifetime: sequential visits may
/// reuse session state, `reset` runs between visits, and `close` runs exactly
/// once at the end regardless of how the quota ended.
async fn run_worker(
    quota: WorkerQuota,
    factory: Arc<dyn VisitorFactory>,
    policy: RetryPolicy,
    counter: Arc<VisitCounter>,
    reporter: Arc<dyn ProgressReporter>,
    mut shutdown: ShutdownToken,
) {
    let index = quota.worker_index;

    let mut visitor = match factory.create(index).await {
        Ok(visitor) => visitor,
        Err(e) => {
            // Acquisition faults become classified failures; the pool keeps going
            tracing::error!("Worker {} could not acquire a visit session: {}", index, e);
            for _ in 0..quota.assigned_count {
                counter.increment_fail();
                let outcome = VisitOutcome::Failure {
                    class: ErrorClass::Other,
                    message: format!("session acquisition failed: {}", e),
                };
                let (success, fail) = counter.get_counts();
                reporter.on_attempt_complete(&outcome, success, fail).await;
            }
            return;
        }
    };

    tracing::debug!("Worker {} starting quota of {}", index, quota.assigned_count);

    for visit_no in 0..quota.assigned_count {
        if shutdown.is_shutdown() {
            tracing::debug!(
                "Worker {} draining with {} visits unprocessed",
                index,
                quota.assigned_count - visit_no
            );
            break;
        }

        match policy
            .execute_with_retry(visitor.as_mut(), &counter, &mut shutdown)
            .await
        {
            Some(outcome) => {
                let (success, fail) = counter.get_counts();
                reporter.on_attempt_complete(&outcome, success, fail).await;
            }
            // Cancelled before an attempt completed; nothing to report
            None => break,
        }

        if visit_no + 1 < quota.assigned_count {
            visitor.reset();
        }
    }

    // Release the session exactly once; close() swallows its own faults
    visitor.close().await;
    tracing::debug!("Worker {} finished", index);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HttpConfig, ThrottleConfig, VisitConfig};
    use crate::output::NullReporter;
    use crate::visit::Visitor;
    use crate::RevisitError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn create_test_config(total_visits: u64, workers: u32) -> Config {
        Config {
            visit: VisitConfig {
                target_url: "https://example.com/".to_string(),
                total_visits,
                workers,
                max_retries: 2,
            },
            throttle: ThrottleConfig {
                cpu_threshold_percent: 100.0,
                sample_interval_ms: 1000,
                pause_poll_ms: 100,
            },
            http: HttpConfig::default(),
        }
    }

    struct IdleSampler;

    impl CpuSampler for IdleSampler {
        fn sample_cpu_percent(&self) -> Option<f32> {
            Some(0.0)
        }
    }

    #[derive(Default)]
    struct LifecycleCounts {
        visits: AtomicU64,
        resets: AtomicU64,
        closes: AtomicU64,
        created: AtomicU64,
    }

    struct TrackingVisitor {
        counts: Arc<LifecycleCounts>,
    }

    #[async_trait]
    impl Visitor for TrackingVisitor {
        async fn visit(&mut self) -> VisitOutcome {
            self.counts.visits.fetch_add(1, Ordering::Relaxed);
            VisitOutcome::Success {
                status_code: 200,
                elapsed: Duration::from_millis(1),
            }
        }

        fn reset(&mut self) {
            self.counts.resets.fetch_add(1, Ordering::Relaxed);
        }

        async fn close(&mut self) {
            self.counts.closes.fetch_add(1, Ordering::Relaxed);
        }
    }

    struct TrackingFactory {
        counts: Arc<LifecycleCounts>,
    }

    #[async_trait]
    impl VisitorFactory for TrackingFactory {
        async fn create(&self, _worker_index: usize) -> Result<Box<dyn Visitor>, RevisitError> {
            self.counts.created.fetch_add(1, Ordering::Relaxed);
            Ok(Box::new(TrackingVisitor {
                counts: Arc::clone(&self.counts),
            }))
        }
    }

    struct BrokenFactory;

    #[async_trait]
    impl VisitorFactory for BrokenFactory {
        async fn create(&self, _worker_index: usize) -> Result<Box<dyn Visitor>, RevisitError> {
            Err(RevisitError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "no sessions available",
            )))
        }
    }

    fn dispatcher_with(factory: Arc<dyn VisitorFactory>, total: u64, workers: u32) -> Dispatcher {
        Dispatcher::new(
            create_test_config(total, workers),
            factory,
            Arc::new(NullReporter),
            Arc::new(IdleSampler),
        )
    }

    #[tokio::test]
    async fn test_all_visits_succeed() {
        let counts = Arc::new(LifecycleCounts::default());
        let factory = Arc::new(TrackingFactory {
            counts: Arc::clone(&counts),
        });
        let (_sender, token) = shutdown_channel();

        let summary = dispatcher_with(factory, 10, 3).run(token).await;

        assert_eq!(summary.success, 10);
        assert_eq!(summary.fail, 0);
        assert!(!summary.interrupted);
        assert_eq!(counts.visits.load(Ordering::Relaxed), 10);
    }

    #[tokio::test]
    async fn test_one_session_per_worker() {
        let counts = Arc::new(LifecycleCounts::default());
        let factory = Arc::new(TrackingFactory {
            counts: Arc::clone(&counts),
        });
        let (_sender, token) = shutdown_channel();

        dispatcher_with(factory, 10, 3).run(token).await;

        // One visitor created and closed per spawned worker
        assert_eq!(counts.created.load(Ordering::Relaxed), 3);
        assert_eq!(counts.closes.load(Ordering::Relaxed), 3);
        // Reset runs between visits, not after the last: quotas 4,3,3 -> 3+2+2
        assert_eq!(counts.resets.load(Ordering::Relaxed), 7);
    }

    #[tokio::test]
    async fn test_zero_quota_workers_not_spawned() {
        let counts = Arc::new(LifecycleCounts::default());
        let factory = Arc::new(TrackingFactory {
            counts: Arc::clone(&counts),
        });
        let (_sender, token) = shutdown_channel();

        let summary = dispatcher_with(factory, 2, 5).run(token).await;

        assert_eq!(summary.success, 2);
        // Only the two workers with non-empty quotas ever got a session
        assert_eq!(counts.created.load(Ordering::Relaxed), 2);
        assert_eq!(counts.closes.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn test_session_acquisition_failure_burns_quota() {
        let (_sender, token) = shutdown_channel();

        let summary = dispatcher_with(Arc::new(BrokenFactory), 4, 2).run(token).await;

        assert_eq!(summary.success, 0);
        assert_eq!(summary.fail, 4);
        assert!(!summary.interrupted);
    }
}
