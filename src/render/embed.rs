//! Inline script sources read from disk.

use std::fs;
use std::path::{Component, Path};

use crate::{debug, log};

/// Read `relative` under `root` as a string.
///
/// Leading separators are stripped. A path that would leave `root` (`..`,
/// a drive prefix) is logged and yields `""`, as does a read failure. A
/// missing file yields `""`.
pub fn read_embedded(root: &Path, relative: &str) -> String {
    let relative = relative.trim().trim_start_matches(['/', '\\']);
    if relative.is_empty() {
        return String::new();
    }
    if !stays_under_root(Path::new(relative)) {
        log!("error"; "embed source {} escapes {}, ignoring it", relative, root.display());
        return String::new();
    }

    let path = root.join(relative);
    if !path.exists() {
        debug!("embed"; "embed source {} doesn't exist", path.display());
        return String::new();
    }

    fs::read_to_string(&path).unwrap_or_else(|e| {
        log!("error"; "error reading embed resource {}: {}", path.display(), e);
        String::new()
    })
}

/// `true` when `relative` only descends from where it is joined.
fn stays_under_root(relative: &Path) -> bool {
    relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
