//! dashsync CLI
//!
//! Offline tooling around reconciled dashboard configurations.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            eprintln!("{}: tracing subscriber already set", "warning".yellow());
        }
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Normalize { file, sha256 } => commands::run_normalize(&file, sha256),
        Commands::Diff {
            file,
            state,
            name,
            folder,
            json,
        } => {
            let settings = commands::load_settings(cli.settings.as_deref())?;
            commands::run_diff(&file, &state, &name, folder.as_deref(), &settings, json)
        }
        Commands::Show { state, json } => commands::run_show(&state, json),
    }
}
