//! Modification-time index for tracked config files.
//!
//! A file's entry is written before the file is parsed. A broken file is
//! therefore not re-parsed on every sweep, while a file changed again during
//! parsing still shows a newer mtime on the next sweep.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use dashmap::DashMap;

/// Get the modification time of a file
///
/// Returns `None` if the file doesn't exist or mtime cannot be read
pub fn get_mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}

/// Config-file path → last observed modification time.
#[derive(Debug, Default)]
pub struct ModTimeIndex {
    entries: DashMap<PathBuf, SystemTime>,
}

impl ModTimeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, path: &Path, modified: SystemTime) {
        self.entries.insert(path.to_path_buf(), modified);
    }

    pub fn get(&self, path: &Path) -> Option<SystemTime> {
        self.entries.get(path).map(|e| *e.value())
    }

    pub fn is_tracked(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    /// Copy of all entries, so callers can reload without holding map locks.
    pub fn snapshot(&self) -> Vec<(PathBuf, SystemTime)> {
        self.entries
            .iter()
            .map(|e| (e.key().clone(), *e.value()))
            .collect()
    }

    /// Tracked files whose on-disk mtime is newer than the recorded one.
    ///
    /// Files that vanished are skipped; their loaded state stays as is.
    pub fn changed(&self) -> Vec<PathBuf> {
        self.snapshot()
            .into_iter()
            .filter(|(path, recorded)| get_mtime(path).is_some_and(|current| current > *recorded))
            .map(|(path, _)| path)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
