use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vtl_cli::commands::{competencies, map, replay};
use vtl_cli::{Cli, Commands, Config};

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // try_init: tests may have installed a subscriber already
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    match &cli.command {
        Some(Commands::Replay { script, json }) => {
            let config = load_config(cli.config.as_deref())?;
            replay::run(script, &config, *json)?;
        }
        Some(Commands::Map {
            duration,
            trash,
            to_real,
            times,
        }) => {
            map::run(*duration, trash, *to_real, times)?;
        }
        Some(Commands::Competencies { json }) => {
            let config = load_config(cli.config.as_deref())?;
            competencies::run(&config, *json)?;
        }
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
