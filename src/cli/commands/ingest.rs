//! Ingest command: store logs, archives and directories for a user

use super::shared::{create_progress_bar, open_store, print_json, resolve_user};
use crate::app::services::ingestion::{IngestionOrchestrator, UploadResult, UploadStatus};
use crate::app::services::telemetry_parser::TelemetryParser;
use crate::cli::args::{Args, IngestArgs, OutputFormat};
use crate::error::{ObdError, Result};
use colored::*;
use indicatif::HumanDuration;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Ingest every path for a registered user
///
/// Upload size limits do not apply to local files. Fails only when nothing
/// at all could be stored.
pub async fn run_ingest(args: &Args, cmd: IngestArgs) -> Result<()> {
    let start_time = Instant::now();
    let config = args.load_config()?;
    let store = Arc::new(open_store(&config)?);
    let user_id = resolve_user(&store, &cmd.user)?;

    let orchestrator = Arc::new(IngestionOrchestrator::new(
        TelemetryParser::default(),
        store,
        config.upload,
    ));

    let progress_bar = args
        .show_progress()
        .then(|| create_progress_bar(cmd.paths.len() as u64, "Ingesting"));

    let mut result = UploadResult::new();
    for path in cmd.paths {
        if let Some(pb) = &progress_bar {
            pb.set_message(path.display().to_string());
        }

        let orchestrator = orchestrator.clone();
        let outcome = tokio::task::spawn_blocking(move || orchestrator.ingest_path(user_id, &path))
            .await
            .map_err(|e| ObdError::processing_interrupted(e.to_string()))?;
        result.merge(outcome);

        if let Some(pb) = &progress_bar {
            pb.inc(1);
        }
    }

    if let Some(pb) = &progress_bar {
        pb.finish_and_clear();
    }

    info!(
        "Ingested {} rows from {} files in {:.2}s",
        result.total_rows_processed,
        result.total_files_processed,
        start_time.elapsed().as_secs_f64()
    );

    match args.output_format {
        OutputFormat::Json => print_json(&json!({
            "summary": result.summary(),
            "success": result.success,
            "errors": result.errors,
        }))?,
        OutputFormat::Human => print_human(&result, start_time),
    }

    if result.status() == UploadStatus::AllFailed {
        return Err(ObdError::upload_rejected("No files could be ingested"));
    }
    Ok(())
}

fn print_human(result: &UploadResult, start_time: Instant) {
    for success in &result.success {
        let date = success.date.as_deref().unwrap_or("-");
        println!(
            "{} {} {} rows ({})",
            "stored  ".green().bold(),
            success.file,
            success.rows_processed,
            date
        );
        if !success.unsupported_fields.is_empty() {
            println!(
                "         unsupported: {}",
                success.unsupported_fields.join(", ").yellow()
            );
        }
    }

    for failure in &result.errors {
        println!("{} {}", "rejected".red().bold(), failure.file);
        for error in &failure.errors {
            println!("         {}", error.bright_black());
        }
    }

    let summary = result.summary();
    println!();
    println!(
        "{} files stored, {} rejected, {} rows in {}",
        summary.successful_files.to_string().green(),
        summary.failed_files.to_string().red(),
        summary.total_rows_processed.to_string().bright_white().bold(),
        HumanDuration(start_time.elapsed())
    );
}
