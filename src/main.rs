//! head-assets: inspect and watch an html head asset registry.

mod cli;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use head_assets::config::AssetsConfig;
use head_assets::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = AssetsConfig::load(&cli.config)
        .with_context(|| format!("failed to load settings from {}", cli.config.display()))?;

    match &cli.command {
        Commands::Check => cli::check::check(&config),
        Commands::Render { head } => cli::render::render(&config, head),
        Commands::Watch { head } => cli::watch::watch(&config, head),
    }
}
