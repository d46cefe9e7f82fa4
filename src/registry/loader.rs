//! Config loader: JSON descriptor files → stored bundles.
//!
//! # File format
//!
//! ```json
//! [
//!   { "aliases": { "jquery": "/js/jquery-3.7.1.min.js" } },
//!   { "paths": ["/", "/home"], "title": "home.title",
//!     "meta": [{ "name": "description", "content": "home.desc" }],
//!     "scripts": ["jquery", { "src": "/js/home.js", "defer": "defer" }],
//!     "links": ["/css/home.css"] },
//!   { "name": "footer", "scripts": ["/js/footer.js"] }
//! ]
//! ```
//!
//! A file named [`GLOBAL_FILE`] holds global descriptors and aliases; every
//! other file holds path-bound or named descriptors.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jwalk::WalkDir;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::Registry;
use super::bundle::{AssetBundle, AssetItem, AttrRecord, is_blank};
use crate::cache::Scope as CacheScope;
use crate::core::AssetKind;
use crate::reload::mtime::get_mtime;
use crate::{debug, log};

/// Base name of the file holding global descriptors and aliases.
pub const GLOBAL_FILE: &str = "global-assets.json";

// ============================================================================
// Errors and reports
// ============================================================================

/// Why a load pass was abandoned. Never leaves [`Registry::load_file`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("error while parsing assets `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("unexpected shape of descriptor #{index} in `{path}`")]
    Shape {
        path: PathBuf,
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// What one or more load passes stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Files parsed successfully
    pub files: usize,
    /// Global bundle stores
    pub global: usize,
    /// Path-bound bundle stores (one per path)
    pub paths: usize,
    /// Named bundle stores
    pub named: usize,
    /// Alias keys merged
    pub aliases: usize,
    /// Descriptors skipped (no paths, or nothing to render)
    pub skipped: usize,
    /// Files that failed to parse
    pub failed: usize,
}

impl LoadReport {
    pub fn merge(&mut self, other: &Self) {
        self.files += other.files;
        self.global += other.global;
        self.paths += other.paths;
        self.named += other.named;
        self.aliases += other.aliases;
        self.skipped += other.skipped;
        self.failed += other.failed;
    }

    /// Total bundle stores.
    pub fn bundles(&self) -> usize {
        self.global + self.paths + self.named
    }
}

// ============================================================================
// Descriptor
// ============================================================================

/// One descriptor object as written in a config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDescriptor {
    aliases: Option<Map<String, Value>>,
    paths: Option<Vec<String>>,
    name: Option<String>,
    title: Option<String>,
    meta: Option<Vec<AssetItem>>,
    scripts: Option<Vec<AssetItem>>,
    links: Option<Vec<AssetItem>>,
}

/// Where a descriptor's bundle goes.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Global,
    Named(String),
    Paths(Vec<String>),
}

/// Whether a file holds global descriptors.
#[inline]
pub fn is_global_file(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name == GLOBAL_FILE)
}

// ============================================================================
// Loading
// ============================================================================

impl Registry {
    /// Load (or reload) one config file.
    ///
    /// Never fails: a missing file is skipped, a broken file is logged and the
    /// state it loaded earlier stays in place. Returns what was stored, or
    /// `None` if the file was missing or broken.
    pub fn load_file(&self, path: &Path) -> Option<LoadReport> {
        if !path.exists() {
            debug!("load"; "asset config {} doesn't exist, ignoring it", path.display());
            return None;
        }

        match self.try_load(path) {
            Ok(report) => {
                debug!(
                    "load";
                    "{}: {} global, {} path, {} named, {} aliases, {} skipped",
                    path.display(), report.global, report.paths, report.named, report.aliases, report.skipped
                );
                Some(report)
            }
            Err(e) => {
                log!("error"; "{}", error_chain(&e));
                None
            }
        }
    }

    /// Load every file under `sources` in discovery order.
    pub fn load_sources(&self, sources: &[PathBuf]) -> LoadReport {
        let mut total = LoadReport::default();
        for file in discover_sources(sources) {
            log!("load"; "loading asset config {}", file.display());
            match self.load_file(&file) {
                Some(report) => total.merge(&report),
                None if file.exists() => total.failed += 1,
                None => {}
            }
        }
        total
    }

    fn try_load(&self, path: &Path) -> Result<LoadReport, LoadError> {
        // recorded before parsing so a broken file is not retried every sweep
        if let Some(modified) = get_mtime(path) {
            self.mtimes.record(path, modified);
        }

        let global = is_global_file(path);
        let content = fs::read(path).map_err(|e| LoadError::Io(path.to_path_buf(), e))?;
        let descriptors: Vec<Value> =
            serde_json::from_slice(&content).map_err(|e| LoadError::Json(path.to_path_buf(), e))?;

        let mut report = LoadReport {
            files: 1,
            ..Default::default()
        };

        for (index, value) in descriptors.into_iter().enumerate() {
            let raw: RawDescriptor = serde_json::from_value(value).map_err(|source| LoadError::Shape {
                path: path.to_path_buf(),
                index,
                source,
            })?;
            self.apply_descriptor(raw, global, path, &mut report);
        }

        Ok(report)
    }

    fn apply_descriptor(&self, raw: RawDescriptor, global: bool, file: &Path, report: &mut LoadReport) {
        if global && let Some(aliases) = &raw.aliases {
            report.aliases += self.aliases.merge(aliases);
        }

        let name = raw.name.filter(|n| !is_blank(n));
        let paths = raw.paths.unwrap_or_default();

        let target = match (global, name) {
            (true, _) => Target::Global,
            (false, Some(name)) => Target::Named(name),
            (false, None) if !paths.is_empty() => Target::Paths(paths),
            (false, None) => {
                log!("load"; "no paths for asset in {}, ignoring it", file.display());
                report.skipped += 1;
                return;
            }
        };

        let bundle = self.build_bundle(raw.title, raw.meta, raw.scripts, raw.links);
        if bundle.is_empty() {
            report.skipped += 1;
            return;
        }

        self.store_bundle(target, Arc::new(bundle), report);
    }

    /// Normalize one descriptor's content, applying aliases.
    fn build_bundle(
        &self,
        title: Option<String>,
        meta: Option<Vec<AssetItem>>,
        scripts: Option<Vec<AssetItem>>,
        links: Option<Vec<AssetItem>>,
    ) -> AssetBundle {
        let records = |items: Option<Vec<AssetItem>>, kind: AssetKind| -> Vec<AttrRecord> {
            items
                .unwrap_or_default()
                .iter()
                .filter_map(|item| self.resolve_item(item, kind))
                .collect()
        };

        AssetBundle {
            title: title
                .filter(|t| !is_blank(t))
                .map(|t| self.aliases.resolve(&t)),
            meta: records(meta, AssetKind::Meta),
            scripts: records(scripts, AssetKind::Scripts),
            links: records(links, AssetKind::Links),
        }
    }

    /// Alias substitution, then shorthand expansion.
    fn resolve_item(&self, item: &AssetItem, kind: AssetKind) -> Option<AttrRecord> {
        match item {
            AssetItem::Shorthand(value) => {
                AssetItem::Shorthand(self.aliases.resolve(value)).to_record(kind)
            }
            AssetItem::Record(record) => item
                .to_record(kind)
                .map(|_| self.aliases.apply(record)),
        }
    }

    fn store_bundle(&self, target: Target, bundle: Arc<AssetBundle>, report: &mut LoadReport) {
        let caching = self.cache.is_enabled();
        match target {
            Target::Global => {
                self.store.set_global(bundle);
                report.global += 1;
                // global content feeds every path lookup
                if caching {
                    self.cache.clear();
                }
            }
            Target::Named(name) => {
                self.store.set_named(name.clone(), bundle);
                report.named += 1;
                if caching {
                    self.cache.remove(CacheScope::Name, &name);
                }
            }
            Target::Paths(paths) => {
                for path in paths {
                    self.store.set_path(path.clone(), Arc::clone(&bundle));
                    report.paths += 1;
                    if caching {
                        self.cache.remove(CacheScope::Path, &path);
                    }
                }
            }
        }
    }
}

/// Format an error with its source chain on one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

// ============================================================================
// Source discovery
// ============================================================================

/// Expand configured sources into config files.
///
/// Files are kept in configured order. Directories are walked for `*.json`
/// files, grouped by parent directory (a directory before its
/// subdirectories) and sorted by path within each group, with [`GLOBAL_FILE`]
/// at the front of its group so its aliases apply to its siblings. Missing sources are
/// kept as-is (loading skips them). Duplicates keep their first position.
pub fn discover_sources(sources: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for source in sources {
        if source.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(source)
                .sort(true)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.file_type().is_file())
                .map(|e| e.path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
                .collect();
            found.sort_by(|a, b| {
                (a.parent(), !is_global_file(a), a).cmp(&(b.parent(), !is_global_file(b), b))
            });
            files.extend(found);
        } else {
            files.push(source.clone());
        }
    }

    let mut seen = rustc_hash::FxHashSet::default();
    files.retain(|f| seen.insert(f.clone()));
    files
}
