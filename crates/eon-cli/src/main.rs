use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use eon_cli::commands::{axis, check, convert, import, list, rows};
use eon_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    match &cli.command {
        Some(Commands::Import { file, json }) => import::run(file, *json, &config)?,
        Some(Commands::Convert { input, output }) => convert::run(input, output, &config)?,
        Some(Commands::Check { file, format, json }) => {
            check::run(file.as_deref(), format.as_deref(), *json, &config)?;
        }
        Some(Commands::Rows { file }) => rows::run(file, &config)?,
        Some(Commands::Axis { file }) => axis::run(file, &config)?,
        Some(Commands::List { file }) => list::run(file, &config)?,
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
