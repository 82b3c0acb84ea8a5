//! Validate command: structural check of telemetry logs

use super::shared::print_json;
use crate::app::services::telemetry_parser::TelemetryParser;
use crate::cli::args::{Args, OutputFormat, ValidateArgs};
use crate::error::{ObdError, Result};
use colored::*;
use serde_json::json;
use tracing::{debug, info};

/// Validate each file and report; fails if any file is invalid
pub async fn run_validate(args: &Args, cmd: ValidateArgs) -> Result<()> {
    let parser = TelemetryParser::default();
    let mut reports = Vec::with_capacity(cmd.files.len());

    for path in &cmd.files {
        let report = parser.validate_file(path);
        debug!("{}: valid={}", path.display(), report.is_valid);
        reports.push((path, report));
    }

    let invalid = reports.iter().filter(|(_, report)| !report.is_valid).count();

    match args.output_format {
        OutputFormat::Json => {
            let entries: Vec<_> = reports
                .iter()
                .map(|(path, report)| {
                    json!({
                        "file": path.display().to_string(),
                        "is_valid": report.is_valid,
                        "errors": report.errors,
                    })
                })
                .collect();
            print_json(&entries)?;
        }
        OutputFormat::Human => {
            for (path, report) in &reports {
                if report.is_valid {
                    println!("{} {}", "valid  ".green().bold(), path.display());
                } else {
                    println!("{} {}", "invalid".red().bold(), path.display());
                    for error in &report.errors {
                        println!("    {}", error.bright_black());
                    }
                }
            }
        }
    }

    info!("Validated {} files, {} invalid", reports.len(), invalid);

    if invalid > 0 {
        return Err(ObdError::invalid_request(format!(
            "{} of {} files failed validation",
            invalid,
            reports.len()
        )));
    }
    Ok(())
}
