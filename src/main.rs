use anyhow::Context;
use clap::{CommandFactory, Parser};
use obd_ingest::ObdError;
use obd_ingest::cli::args::{Args, Commands};
use obd_ingest::cli::commands;
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // With no subcommand, show help and exit
    if args.command.is_none() {
        let _ = Args::command().print_help();
        println!();
        process::exit(0);
    }

    if let Err(error) = run(args) {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;

    // The HTTP service shuts itself down gracefully on CTRL+C
    if matches!(args.command, Some(Commands::Serve(_))) {
        return runtime
            .block_on(commands::run(args))
            .context("HTTP service failed");
    }

    runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => result,
            signal = tokio::signal::ctrl_c() => {
                if let Err(e) = signal {
                    eprintln!("Failed to listen for CTRL+C: {}", e);
                }
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(ObdError::processing_interrupted("Interrupted by user"))
            }
        }
    })?;

    Ok(())
}
