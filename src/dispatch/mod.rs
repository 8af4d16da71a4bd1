//! Dispatch module for running a visit plan
//!
//! This module contains the concurrent scheduling core, including:
//! - Partitioning the total count into per-worker quotas
//! - Bounded retry with error-class-aware backoff
//! - Worker pool orchestration and graceful draining
//! - Cooperative shutdown signalling

mod coordinator;
mod partition;
mod retry;
mod shutdown;

pub use coordinator::Dispatcher;
pub use partition::{partition, WorkerQuota};
pub use retry::{backoff_delay, backoff_delay_with_factor, RetryPolicy};
pub use shutdown::{shutdown_channel, ShutdownSender, ShutdownToken};

use crate::config::Config;
use crate::monitor::SysinfoSampler;
use crate::output::{ConsoleReporter, RunSummary};
use crate::visit::HttpVisitorFactory;
use crate::Result;
use std::sync::Arc;

/// Runs a complete visit plan against the configured target
///
/// This is the main entry point for a production run. It wires the HTTP
/// visit capability, console progress reporting, and host CPU sampling into
/// a [`Dispatcher`] and runs it to completion.
///
/// # Arguments
///
/// * `config` - The validated run configuration
/// * `shutdown` - Token that drains the pool early when signalled
///
/// # Returns
///
/// * `Ok(RunSummary)` - Final statistics; produced even if every visit failed
///   or the run was interrupted
/// * `Err(RevisitError)` - The run could not start (bad target URL)
pub async fn run_visits(config: Config, shutdown: ShutdownToken) -> Result<RunSummary> {
    let factory = Arc::new(HttpVisitorFactory::new(
        &config.visit.target_url,
        config.http.clone(),
    )?);
    let reporter = Arc::new(ConsoleReporter::new(config.visit.total_visits));
    let sampler = Arc::new(SysinfoSampler::new());

    let dispatcher = Dispatcher::new(config, factory, reporter, sampler);
    Ok(dispatcher.run(shutdown).await)
}
