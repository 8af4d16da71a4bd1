//! Revisit main entry point
//!
//! This is the command-line interface for the Revisit visit generator.

use clap::Parser;
use revisit::config::load_config_with_hash;
use revisit::dispatch::{run_visits, shutdown_channel};
use revisit::output::print_summary;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Revisit: a concurrent repeated-visit generator
///
/// Revisit dispatches a fixed number of visits to a target URL across a
/// bounded worker pool, retrying transient failures with escalating backoff
/// and pausing cooperatively when the host is under CPU pressure.
#[derive(Parser, Debug)]
#[command(name = "revisit")]
#[command(version = "1.0.0")]
#[command(about = "A concurrent repeated-visit generator", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the visit plan without running it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config, &config_hash);
        return Ok(());
    }

    handle_run(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("revisit=info,warn"),
            1 => EnvFilter::new("revisit=debug,info"),
            2 => EnvFilter::new("revisit=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the visit plan
fn handle_dry_run(config: &revisit::config::Config, config_hash: &str) {
    use revisit::dispatch::partition;

    println!("=== Revisit Dry Run ===\n");

    println!("Visit Plan:");
    println!("  Target URL: {}", config.visit.target_url);
    println!("  Total visits: {}", config.visit.total_visits);
    println!("  Workers: {}", config.visit.workers);
    println!("  Max retries per visit: {}", config.visit.max_retries);

    println!("\nThrottling:");
    println!(
        "  CPU pause threshold: {:.1}%",
        config.throttle.cpu_threshold_percent
    );
    println!(
        "  Sample interval: {}ms",
        config.throttle.sample_interval_ms
    );
    println!("  Pause poll: {}ms", config.throttle.pause_poll_ms);

    println!("\nHTTP:");
    println!(
        "  Request timeout: {}s",
        config.http.request_timeout_secs
    );
    println!(
        "  Connect timeout: {}s",
        config.http.connect_timeout_secs
    );
    if config.http.user_agents.is_empty() {
        println!("  User agents: built-in list");
    } else {
        println!("  User agents: {} configured", config.http.user_agents.len());
    }

    let quotas = partition(config.visit.total_visits, config.visit.workers);
    let active = quotas.iter().filter(|q| q.assigned_count > 0).count();
    println!("\nWorker Quotas ({} active):", active);
    for quota in quotas.iter().filter(|q| q.assigned_count > 0) {
        println!("  worker {}: {} visits", quota.worker_index, quota.assigned_count);
    }

    println!("\nConfig hash: {}", config_hash);
    println!("\n✓ Configuration is valid");
}

/// Handles the main run: wires Ctrl-C to graceful draining
async fn handle_run(config: revisit::config::Config) -> anyhow::Result<()> {
    tracing::info!(
        "Visiting {} a total of {} times with {} workers",
        config.visit.target_url,
        config.visit.total_visits,
        config.visit.workers
    );

    let (sender, token) = shutdown_channel();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, draining workers before reporting");
            sender.shutdown();
        }
    });

    let summary = run_visits(config, token).await?;

    print_summary(&summary);

    Ok(())
}
