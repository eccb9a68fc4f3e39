//! lwc-preview: local previews of Lightning Web Components
//!
//! Starts a preview server for one component of a Salesforce DX project and
//! opens it in a desktop browser, an iOS simulator or an Android emulator.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod app_config;
mod commands;
mod launcher;
mod logging;

/// Preview Lightning Web Components locally
#[derive(Parser)]
#[command(name = "lwc-preview")]
#[command(about = "Preview Lightning Web Components on desktop and mobile", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Preview a component
    ///
    /// Serves the component from the project and opens it on the target
    /// platform. The server exits on its own after the idle timeout.
    Preview(commands::preview::PreviewArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    execute_command(cli.command)
}

fn execute_command(command: Commands) -> Result<()> {
    match command {
        Commands::Preview(args) => {
            logging::init(args.verbose);
            let runtime = tokio::runtime::Runtime::new()?;
            let code = runtime.block_on(commands::preview::execute(args))?;
            std::process::exit(code);
        },
    }
}
