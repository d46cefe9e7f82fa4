//! Settings for the asset registry, read from `assets.toml`.
//!
//! ```toml
//! root = "."                  # directory `embed` paths are relative to
//! sources = ["assets/"]       # config files or directories of them
//! messages = "messages/"      # optional message catalog directory
//! caching = true
//! reload_interval = 2000      # milliseconds, <= 0 disables reloading
//! ```
//!
//! Relative paths resolve against the directory holding the settings file.
//! Unknown keys are reported and ignored.

mod error;

pub use error::ConfigError;

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::log;

/// Default settings file name.
pub const CONFIG_FILE: &str = "assets.toml";

const DEFAULT_RELOAD_INTERVAL: i64 = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Embed root directory
    pub root: PathBuf,
    /// Config files or directories, loaded in order
    pub sources: Vec<PathBuf>,
    /// Message catalog directory
    pub messages: Option<PathBuf>,
    /// Cache rendered tags between lookups
    pub caching: bool,
    /// Poll interval in milliseconds
    pub reload_interval: i64,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            sources: Vec::new(),
            messages: None,
            caching: false,
            reload_interval: DEFAULT_RELOAD_INTERVAL,
        }
    }
}

impl AssetsConfig {
    /// Read, normalize and validate a settings file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        config.normalize_paths(&normalize_path(&base));
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Resolve every path against `base`, expanding `~`.
    pub fn normalize_paths(&mut self, base: &Path) {
        self.root = resolve(&self.root, base);
        self.sources = self.sources.iter().map(|p| resolve(p, base)).collect();
        self.messages = self.messages.as_deref().map(|p| resolve(p, base));
    }

    // ========================================================================
    // validation
    // ========================================================================

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::Validation("`sources` lists no asset config files".into()));
        }
        if !self.root.is_dir() {
            return Err(ConfigError::Validation(format!(
                "`root` {} is not a directory",
                self.root.display()
            )));
        }
        if let Some(messages) = &self.messages
            && !messages.is_dir()
        {
            return Err(ConfigError::Validation(format!(
                "`messages` {} is not a directory",
                messages.display()
            )));
        }
        Ok(())
    }

    /// Poll interval, or `None` when reloading is off.
    pub fn reload_interval(&self) -> Option<Duration> {
        u64::try_from(self.reload_interval)
            .ok()
            .filter(|&ms| ms > 0)
            .map(Duration::from_millis)
    }
}

/// Parses TOML content without touching paths.
impl FromStr for AssetsConfig {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(content)?)
    }
}

/// Expand `~` and join relative paths onto `base`.
fn resolve(path: &Path, base: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    let path = PathBuf::from(expanded);
    let full = if path.is_relative() { base.join(path) } else { path };
    normalize_path(&full)
}

/// Absolute form of `path`, canonical when it exists.
fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}
