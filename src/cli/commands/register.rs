//! Register command: create a user account

use super::shared::{open_store, print_json};
use crate::app::services::storage::validate_registration;
use crate::cli::args::{Args, OutputFormat, RegisterArgs};
use crate::error::Result;
use colored::*;
use serde_json::json;

pub async fn run_register(args: &Args, cmd: RegisterArgs) -> Result<()> {
    let email = validate_registration(&cmd.email, &cmd.password)?;
    let config = args.load_config()?;
    let store = open_store(&config)?;
    let user_id = store.create_user(&email, &cmd.password)?;

    match args.output_format {
        OutputFormat::Json => print_json(&json!({ "user_id": user_id, "email": email })),
        OutputFormat::Human => {
            println!("Registered {} (user {})", email.bright_cyan(), user_id);
            Ok(())
        }
    }
}
