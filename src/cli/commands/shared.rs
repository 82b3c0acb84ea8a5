//! Shared components for CLI commands
//!
//! Logging setup, store access and output helpers used by several
//! subcommands.

use crate::app::services::storage::SqliteStore;
use crate::cli::args::Args;
use crate::config::ObdConfig;
use crate::error::{ObdError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::debug;

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("obd_ingest={}", log_level)));

    if args.quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Open the configured database
pub fn open_store(config: &ObdConfig) -> Result<SqliteStore> {
    Ok(SqliteStore::open(&config.database_path)?.with_session_ttl(config.session.ttl_secs))
}

/// Look up a registered user by email
pub fn resolve_user(store: &SqliteStore, email: &str) -> Result<i64> {
    let email = email.trim().to_lowercase();
    store
        .find_user_id(&email)?
        .ok_or_else(|| ObdError::invalid_request(format!("No user registered as {}", email)))
}

/// Pretty-print a value as JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Progress bar over a known number of items
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}
