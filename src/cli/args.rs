//! Command-line interface definitions.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ColorChoice, Parser, Subcommand};

use head_assets::config::CONFIG_FILE;
use head_assets::core::Locale;
use head_assets::head::{DynamicAssets, HeadRequest};

/// Reloadable html head asset registry
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Settings file path
    #[arg(short = 'C', long, global = true, default_value = CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Load every asset config once and report what was stored
    #[command(visible_alias = "c")]
    Check,

    /// Print the head block for a request path or named bundles
    #[command(visible_alias = "r")]
    Render {
        #[command(flatten)]
        head: HeadArgs,
    },

    /// Reprint the head block whenever asset configs change
    #[command(visible_alias = "w")]
    Watch {
        #[command(flatten)]
        head: HeadArgs,
    },
}

/// What head block to compose
#[derive(Args, Debug, Clone)]
pub struct HeadArgs {
    /// Request path to look up
    #[arg(short, long, default_value = "/")]
    pub path: String,

    /// Locale for message resolution (e.g. en, fr-CA)
    #[arg(short, long, default_value = "")]
    pub locale: String,

    /// Comma-separated kinds: title, meta, links, scripts (default: all)
    #[arg(short, long, conflicts_with = "names")]
    pub types: Option<String>,

    /// Comma-separated bundle names, instead of a path lookup
    #[arg(short, long)]
    pub names: Option<String>,

    /// Leave out global assets
    #[arg(long)]
    pub no_global: bool,

    /// JSON file with request-scoped title, meta, links and scripts
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub dynamic: Option<PathBuf>,
}

impl HeadArgs {
    pub fn request(&self) -> HeadRequest {
        let locale = Locale::new(&self.locale);
        let request = match &self.names {
            Some(names) => HeadRequest::names(locale, names),
            None => HeadRequest::types(self.path.as_str(), locale, self.types.as_deref().unwrap_or_default()),
        };
        request.with_global(!self.no_global)
    }

    /// Dynamic assets from `--dynamic`, or none.
    pub fn dynamic(&self) -> Result<DynamicAssets> {
        let Some(path) = &self.dynamic else {
            return Ok(DynamicAssets::default());
        };
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read dynamic assets {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse dynamic assets {}", path.display()))
    }
}
