//! Resource monitor
//!
//! A single background task samples host CPU utilization on a fixed cadence
//! and publishes a pause flag the workers consult before every visit attempt.
//! The flag is the latest sample only; readers may observe a value stale by
//! at most one sampling cycle.

mod sampler;

pub use sampler::{CpuSampler, SysinfoSampler};

use crate::config::ThrottleConfig;
use crate::dispatch::ShutdownToken;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Shared pause flag published by the monitor
///
/// Single writer (the monitor task), any number of readers. Reading never
/// blocks.
#[derive(Debug, Default)]
pub struct PauseSignal {
    paused: AtomicBool,
}

impl PauseSignal {
    pub fn new() -> Self {
        Self {
            paused: AtomicBool::new(false),
        }
    }

    /// Non-blocking read of the latest published value
    pub fn should_pause(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    pub(crate) fn publish(&self, paused: bool) {
        self.paused.store(paused, Ordering::Relaxed);
    }
}

/// Background CPU monitor owning the sampling loop
///
/// Started by the dispatcher when a run begins and stopped when it ends; the
/// sampling task never outlives the run.
pub struct ResourceMonitor {
    signal: Arc<PauseSignal>,
    handle: JoinHandle<()>,
}

impl ResourceMonitor {
    /// Starts the sampling loop
    ///
    /// # Arguments
    ///
    /// * `sampler` - Source of CPU utilization samples
    /// * `config` - Threshold and cadence settings
    /// * `shutdown` - Token that terminates the loop
    pub fn start(
        sampler: Arc<dyn CpuSampler>,
        config: &ThrottleConfig,
        mut shutdown: ShutdownToken,
    ) -> Self {
        let signal = Arc::new(PauseSignal::new());
        let threshold = config.cpu_threshold_percent;
        let interval = Duration::from_millis(config.sample_interval_ms);

        let loop_signal = Arc::clone(&signal);
        let handle = tokio::spawn(async move {
            let mut was_paused = false;

            loop {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = shutdown.wait() => break,
                }

                let paused = match sampler.sample_cpu_percent() {
                    Some(cpu) => {
                        let paused = cpu > threshold;
                        if paused != was_paused {
                            if paused {
                                tracing::info!(
                                    "CPU at {:.1}% exceeds threshold {:.1}%, pausing workers",
                                    cpu,
                                    threshold
                                );
                            } else {
                                tracing::info!(
                                    "CPU back to {:.1}%, resuming workers",
                                    cpu
                                );
                            }
                        }
                        paused
                    }
                    None => {
                        // Fail open: a broken sampler must not stall the pool
                        tracing::warn!("CPU sampling failed, treating host as unloaded");
                        false
                    }
                };

                loop_signal.publish(paused);
                was_paused = paused;
            }

            tracing::debug!("Resource monitor stopped");
        });

        Self { signal, handle }
    }

    /// Handle to the published pause flag
    pub fn signal(&self) -> Arc<PauseSignal> {
        Arc::clone(&self.signal)
    }

    /// Waits for the sampling loop to exit
    ///
    /// The loop terminates once the shutdown token it was started with is
    /// signalled.
    pub async fn stop(self) {
        if let Err(e) = self.handle.await {
            tracing::warn!("Resource monitor task ended abnormally: {}", e);
        }
    }
}
