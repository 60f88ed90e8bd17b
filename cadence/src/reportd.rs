//! cadence-reportd - weekly report scheduler daemon
//!
//! Runs the report scheduler in the foreground: fires the weekly report job
//! at week's end (Sunday 23:59 local) and absorbs duplicate fires through the
//! generator's idempotency guard. Stop with Ctrl+C.

use anyhow::{Context, Result};
use cadence_core::{Config, Database, Scheduler};
use clap::Parser;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "cadence-reportd")]
#[command(about = "Weekly report scheduler for cadence")]
#[command(version)]
struct Args {
    /// Poll interval in seconds (overrides config)
    #[arg(long)]
    poll: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Ensure XDG environment variables are set before using core library
    Config::ensure_xdg_env();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard =
        cadence_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!("cadence-reportd starting");

    let db_path = Config::database_path();
    tracing::info!(path = %db_path.display(), "Opening database");

    let db = Database::open(&db_path).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    println!("Database: {}", db_path.display());

    let poll_secs = args.poll.unwrap_or(config.scheduler.poll_secs);
    let mut scheduler = Scheduler::start(Arc::new(db), Duration::from_secs(poll_secs));

    // Set up signal handler for graceful shutdown
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        eprintln!("\nShutting down...");
        r.store(false, Ordering::SeqCst);
    })
    .context("failed to set Ctrl+C handler")?;

    println!(
        "Scheduler active (poll every {}s). Reports fire Sunday 23:59. Press Ctrl+C to stop.",
        poll_secs
    );

    while running.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(200));
    }

    scheduler.stop();
    println!("Scheduler stopped.");
    tracing::info!("cadence-reportd stopped");

    Ok(())
}
