//! Preview command: what a telemetry log contains, without storing it

use super::shared::print_json;
use crate::app::services::ingestion::FileKind;
use crate::app::services::ingestion::preview::{PreviewReport, build_preview};
use crate::app::services::telemetry_parser::TelemetryParser;
use crate::cli::args::{Args, OutputFormat, PreviewArgs};
use crate::error::{ObdError, Result};
use colored::*;

pub async fn run_preview(args: &Args, cmd: PreviewArgs) -> Result<()> {
    let name = cmd
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| cmd.file.display().to_string());

    if FileKind::from_name(&name) != Some(FileKind::TelemetryLog) {
        return Err(ObdError::invalid_request(
            "Only CSV telemetry logs can be previewed",
        ));
    }
    if !cmd.file.is_file() {
        return Err(ObdError::invalid_request(format!(
            "File not found: {}",
            cmd.file.display()
        )));
    }

    let report = build_preview(&TelemetryParser::default(), &cmd.file, &name);

    match args.output_format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Human => {
            print_human(&report);
            Ok(())
        }
    }
}

fn print_human(report: &PreviewReport) {
    println!("{}", report.filename.bright_cyan().bold());

    if report.is_valid {
        println!("  Format:          {}", "valid".green());
    } else {
        println!("  Format:          {}", "invalid".red());
        for error in &report.validation_errors {
            println!("    {}", error.bright_black());
        }
    }
    println!("  Estimated rows:  {}", report.estimated_rows);

    if !report.supported_fields_found.is_empty() {
        println!("  Supported fields:");
        for (label, count) in &report.supported_fields_found {
            println!("    {:<36} {}", label, count);
        }
    }

    if !report.unsupported_fields_found.is_empty() {
        println!(
            "  Unsupported fields: {}",
            report.unsupported_fields_found.join(", ").yellow()
        );
    }

    if !report.parse_errors.is_empty() {
        println!("  Parse errors:");
        for error in &report.parse_errors {
            println!("    {}", error.red());
        }
    }

    if !report.sample_data.is_empty() {
        println!("  Sample records:");
        for record in &report.sample_data {
            let values: Vec<String> = record
                .measurements()
                .map(|(field, value)| format!("{}={}", field, value))
                .collect();
            println!("    {} {}", record.timestamp.bright_black(), values.join(" "));
        }
    }
}
