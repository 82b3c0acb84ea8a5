//! Command implementations for the OBD ingestion CLI
//!
//! Each subcommand lives in its own module:
//! - `validate`: structural check of telemetry logs
//! - `preview`: field census, sample records and parse errors
//! - `ingest`: store logs, archives and directories for a user
//! - `query`: print stored records
//! - `register`: create a user account
//! - `serve`: run the HTTP API

pub mod ingest;
pub mod preview;
pub mod query;
pub mod register;
pub mod serve;
pub mod shared;
pub mod validate;

use crate::cli::args::{Args, Commands};
use crate::error::{ObdError, Result};

/// Main command runner
///
/// Sets up logging, then dispatches to the handler for the subcommand.
pub async fn run(args: Args) -> Result<()> {
    shared::setup_logging(&args)?;

    let Some(command) = args.command.clone() else {
        return Err(ObdError::invalid_request("No command given"));
    };

    match command {
        Commands::Validate(cmd) => validate::run_validate(&args, cmd).await,
        Commands::Preview(cmd) => preview::run_preview(&args, cmd).await,
        Commands::Ingest(cmd) => ingest::run_ingest(&args, cmd).await,
        Commands::Query(cmd) => query::run_query(&args, cmd).await,
        Commands::Register(cmd) => register::run_register(&args, cmd).await,
        Commands::Serve(cmd) => serve::run_serve(&args, cmd).await,
    }
}
