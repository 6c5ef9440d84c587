// ABOUTME: Entry point for the renderdeploy CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use renderdeploy::config;
use renderdeploy::error::Result;
use renderdeploy::output::{Output, OutputMode};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = OutputMode::from_flags(cli.quiet, cli.json);

    if let Err(e) = run(cli, mode).await {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, mode: OutputMode) -> Result<()> {
    let dir = match cli.dir {
        Some(dir) => dir,
        None => env::current_dir()?,
    };
    let output = Output::new(mode);

    match cli.command {
        Commands::Init {
            entry_point,
            stage,
            regions,
            force,
        } => {
            config::init_config(
                &dir,
                entry_point.as_deref(),
                stage.as_deref(),
                &regions,
                force,
            )?;
            output.success(&format!("Created {}", config::CONFIG_FILENAME));
            Ok(())
        }
        Commands::Deploy(args) => commands::deploy(&dir, &args.stage, output).await,
        Commands::Remove(args) => commands::remove(&dir, &args.stage, output).await,
        Commands::Resources(args) => commands::print_resources(&dir, &args.stage, output).await,
    }
}
