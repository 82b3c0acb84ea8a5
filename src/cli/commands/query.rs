//! Query command: print stored records

use super::shared::{open_store, print_json, resolve_user};
use crate::app::services::storage::{RecordQuery, RecordStore, resolve_field_filter};
use crate::cli::args::{Args, OutputFormat, QueryArgs};
use crate::error::Result;
use colored::*;
use tracing::debug;

pub async fn run_query(args: &Args, cmd: QueryArgs) -> Result<()> {
    let config = args.load_config()?;
    let store = open_store(&config)?;
    let user_id = resolve_user(&store, &cmd.user)?;

    let limit = config.query.effective_limit(cmd.limit);
    let mut query = RecordQuery::new(limit);
    if let Some(date) = cmd.date {
        query = query.with_date(date);
    }
    if let Some(fields) = resolve_field_filter(&cmd.fields, store.allowed_fields())? {
        query = query.with_fields(fields);
    }

    let records = store.fetch_records(user_id, &query)?;
    debug!("Fetched {} records (limit {})", records.len(), limit);

    match args.output_format {
        OutputFormat::Json => print_json(&records)?,
        OutputFormat::Human => {
            for stored in &records {
                let values: Vec<String> = stored
                    .record
                    .measurements()
                    .map(|(field, value)| format!("{}={}", field, value))
                    .collect();
                println!(
                    "{:>8} {} {}",
                    stored.id.to_string().bright_black(),
                    stored.record.timestamp.bright_cyan(),
                    values.join(" ")
                );
            }
            println!("{} records", records.len());
        }
    }
    Ok(())
}
