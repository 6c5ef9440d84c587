// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "renderdeploy")]
#[command(about = "Deploy a serverless render function and its site across regions")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print final results and warnings
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Project directory (defaults to the current directory)
    #[arg(short = 'C', long, global = true)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new renderdeploy.yml settings file
    Init {
        /// Entry point of the render site
        #[arg(long)]
        entry_point: Option<String>,

        /// Stage that owns the deployment
        #[arg(long)]
        stage: Option<String>,

        /// Region to deploy to (repeatable)
        #[arg(short, long = "region")]
        regions: Vec<String>,

        /// Overwrite an existing settings file
        #[arg(short, long)]
        force: bool,
    },

    /// Rotate credentials, then deploy the function and site to every region
    Deploy(StageArgs),

    /// Delete deployed functions from every region
    Remove(StageArgs),

    /// Print the infrastructure resources with the deploy principal registered
    Resources(StageArgs),
}

#[derive(Args)]
pub struct StageArgs {
    /// Active stage; only the configured deploy stage rotates and deploys
    #[arg(short, long, env = "RENDERDEPLOY_STAGE", default_value = "dev")]
    pub stage: String,
}
