//! Message catalogs for localized titles and attribute values.
//!
//! Any title, attribute name or attribute value may be a message key. A key
//! without a message resolves to itself, so plain values pass through.

use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde_json::{Map, Value};

use crate::core::Locale;
use crate::{debug, log};

/// Source of localized messages.
pub trait MessageSource: Send + Sync {
    /// Look up `key` for `locale`, `None` if there is no message.
    fn message(&self, key: &str, locale: &Locale) -> Option<String>;

    /// Look up `key`, falling back to the key itself.
    fn resolve(&self, key: &str, locale: &Locale) -> String {
        self.message(key, locale).unwrap_or_else(|| key.to_string())
    }
}

/// A source without messages: every key resolves to itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMessages;

impl MessageSource for NoMessages {
    fn message(&self, _key: &str, _locale: &Locale) -> Option<String> {
        None
    }
}

/// File stems that hold the root (locale-independent) table.
const ROOT_STEMS: [&str; 3] = ["messages", "default", "root"];

/// Per-locale flat message tables.
///
/// Lookup walks [`Locale::fallbacks`] and then the root table, so `fr-CA`
/// tries `fr-CA`, `fr`, then root.
#[derive(Debug, Default, Clone)]
pub struct MessageCatalog {
    tables: FxHashMap<String, FxHashMap<String, String>>,
}

impl MessageCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one message. Use [`Locale::root`] for the root table.
    pub fn insert(&mut self, locale: &Locale, key: impl Into<String>, value: impl Into<String>) {
        self.tables
            .entry(locale.as_str().to_string())
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Builder form of [`MessageCatalog::insert`].
    pub fn with(mut self, locale: &str, key: &str, value: &str) -> Self {
        self.insert(&Locale::new(locale), key, value);
        self
    }

    /// Load every `<locale>.json` file in `dir`.
    ///
    /// `messages.json`, `default.json` and `root.json` feed the root table.
    /// Nested objects are flattened with `.` (`{"nav": {"home": "Home"}}` gives
    /// `nav.home`). Unreadable or malformed files are logged and skipped.
    pub fn load_dir(dir: &Path) -> Self {
        let mut catalog = Self::new();

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log!("error"; "cannot read message directory {}: {}", dir.display(), e);
                return catalog;
            }
        };

        let mut files: Vec<_> = entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();

        for file in files {
            let Some(stem) = file.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let locale = if ROOT_STEMS.contains(&stem) {
                Locale::root()
            } else {
                Locale::new(stem)
            };
            match read_table(&file) {
                Ok(table) => {
                    debug!("messages"; "{} messages for `{}`", table.len(), locale);
                    for (key, value) in table {
                        catalog.insert(&locale, key, value);
                    }
                }
                Err(e) => log!("error"; "failed to load messages {}: {}", file.display(), e),
            }
        }

        catalog
    }

    /// Number of messages across all tables.
    pub fn len(&self) -> usize {
        self.tables.values().map(FxHashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MessageSource for MessageCatalog {
    fn message(&self, key: &str, locale: &Locale) -> Option<String> {
        locale
            .fallbacks()
            .into_iter()
            .chain(std::iter::once(""))
            .find_map(|tag| self.tables.get(tag).and_then(|t| t.get(key)))
            .cloned()
    }
}

fn read_table(path: &Path) -> anyhow::Result<Vec<(String, String)>> {
    let content = fs::read_to_string(path)?;
    let root: Map<String, Value> = serde_json::from_str(&content)?;
    let mut out = Vec::new();
    flatten("", &root, &mut out);
    Ok(out)
}

fn flatten(prefix: &str, object: &Map<String, Value>, out: &mut Vec<(String, String)>) {
    for (key, value) in object {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::String(s) => out.push((full, s.clone())),
            Value::Number(n) => out.push((full, n.to_string())),
            Value::Bool(b) => out.push((full, b.to_string())),
            Value::Object(nested) => flatten(&full, nested, out),
            Value::Null | Value::Array(_) => {}
        }
    }
}
