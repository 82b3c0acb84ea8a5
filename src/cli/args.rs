//! Command-line argument definitions for the OBD ingestion tool
//!
//! This module defines the complete CLI interface using the clap derive API.
//! Flags shared by every subcommand (database, logging, output format) are
//! declared once on [`Args`] as global arguments.

use crate::config::ObdConfig;
use crate::error::{ObdError, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;

/// CLI arguments for the OBD telemetry ingestion tool
///
/// Validates, previews and ingests line-oriented OBD telemetry logs into a
/// per-user SQLite store, and serves the same operations over HTTP.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "obd-ingest",
    version,
    about = "Ingest vehicle OBD telemetry logs into a per-user SQLite store",
    long_about = "Parses line-oriented OBD telemetry logs (one timestamped snapshot per line, \
                  comma-separated label=value pairs), tolerating unknown sensor labels while \
                  rejecting structurally broken files. Logs can be validated and previewed \
                  locally, ingested from files, ZIP archives or directories, queried back, \
                  or served over an HTTP API."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// SQLite database file
    ///
    /// Overrides the config file and the OBD_DATABASE_PATH / DATABASE_PATH
    /// environment variables.
    #[arg(long = "database", value_name = "PATH", global = true)]
    pub database: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config_file: Option<PathBuf>,

    /// Increase logging verbosity
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    ///
    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for command results
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        global = true,
        help = "Output format for command results"
    )]
    pub output_format: OutputFormat,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Check the leading lines of telemetry logs for structural errors
    Validate(ValidateArgs),
    /// Report what a telemetry log contains without storing anything
    Preview(PreviewArgs),
    /// Store telemetry logs, ZIP archives or directories for a user
    Ingest(IngestArgs),
    /// Print stored records for a user
    Query(QueryArgs),
    /// Register a user account
    Register(RegisterArgs),
    /// Run the HTTP API
    Serve(ServeArgs),
}

#[derive(Debug, Clone, Parser)]
pub struct ValidateArgs {
    /// Telemetry log files to validate
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Parser)]
pub struct PreviewArgs {
    /// Telemetry log file to preview
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Debug, Clone, Parser)]
pub struct IngestArgs {
    /// Email of the registered user that owns the records
    #[arg(short = 'u', long = "user", value_name = "EMAIL")]
    pub user: String,

    /// Telemetry logs, ZIP archives or directories containing them
    #[arg(value_name = "PATHS", required = true)]
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Clone, Parser)]
pub struct QueryArgs {
    /// Email of the registered user whose records are printed
    #[arg(short = 'u', long = "user", value_name = "EMAIL")]
    pub user: String,

    /// Only records from this day (dd-mm-yyyy)
    #[arg(short = 'd', long = "date", value_name = "DATE", value_parser = parse_cli_date)]
    pub date: Option<NaiveDate>,

    /// Comma-separated measurement columns to return
    #[arg(short = 'f', long = "fields", value_name = "LIST", value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Maximum number of records
    #[arg(short = 'n', long = "limit", value_name = "N")]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Parser)]
pub struct RegisterArgs {
    #[arg(long = "email", value_name = "EMAIL")]
    pub email: String,

    #[arg(long = "password", value_name = "PASSWORD")]
    pub password: String,
}

#[derive(Debug, Clone, Parser)]
pub struct ServeArgs {
    /// Address to listen on (defaults to the configured bind address)
    #[arg(short = 'b', long = "bind", value_name = "ADDR")]
    pub bind: Option<SocketAddr>,
}

/// Output format options for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

fn parse_cli_date(value: &str) -> std::result::Result<NaiveDate, String> {
    crate::app::services::storage::parse_query_date(value)
        .ok_or_else(|| format!("'{}' is not a dd-mm-yyyy date", value))
}

impl Args {
    /// Get the log level based on verbosity settings
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output_format == OutputFormat::Human
    }

    /// Build the effective configuration: file, then environment, then flags
    pub fn load_config(&self) -> Result<ObdConfig> {
        if let Some(path) = &self.config_file {
            if !path.exists() {
                return Err(ObdError::configuration(format!(
                    "Config file does not exist: {}",
                    path.display()
                )));
            }
        }

        let mut config = ObdConfig::load(self.config_file.as_deref())?;
        if let Some(database) = &self.database {
            config = config.with_database_path(database);
        }
        config.validate()?;
        Ok(config)
    }
}
