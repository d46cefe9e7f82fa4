//! Normalized asset records.
//!
//! A descriptor in a config file becomes one [`AssetBundle`]: an optional
//! title plus ordered meta, script and link [`AttrRecord`]s. Scripts and links
//! may be written as bare strings in config, see [`AssetItem`].

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::core::AssetKind;

/// `true` for empty or whitespace-only strings.
#[inline]
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

// ============================================================================
// AttrRecord
// ============================================================================

/// Ordered attribute-name → value mapping.
///
/// Insertion order is rendering order. Re-inserting an existing name replaces
/// its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct AttrRecord(Vec<(String, String)>);

impl AttrRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical record for a script shorthand.
    pub fn script(src: impl Into<String>) -> Self {
        let mut record = Self::new();
        record.insert("type", "text/javascript");
        record.insert("src", src);
        record
    }

    /// Canonical record for a stylesheet link shorthand.
    pub fn stylesheet(href: impl Into<String>) -> Self {
        let mut record = Self::new();
        record.insert("rel", "stylesheet");
        record.insert("type", "text/css");
        record.insert("href", href);
        record
    }

    /// Build from a JSON object, keeping scalar values that are not blank.
    ///
    /// Strings are taken verbatim, numbers and booleans by their JSON text.
    /// Nulls, arrays and nested objects are dropped.
    pub fn from_json(object: &Map<String, Value>) -> Self {
        let mut record = Self::new();
        for (name, value) in object {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => continue,
            };
            if !is_blank(&text) {
                record.insert(name.clone(), text);
            }
        }
        record
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rewrite every value, keeping names and order.
    pub fn map_values(&self, mut f: impl FnMut(&str) -> String) -> Self {
        Self(self.0.iter().map(|(n, v)| (n.clone(), f(v))).collect())
    }
}

impl From<Map<String, Value>> for AttrRecord {
    fn from(object: Map<String, Value>) -> Self {
        Self::from_json(&object)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttrRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

// ============================================================================
// AssetItem
// ============================================================================

/// One entry of a `meta`, `scripts` or `links` list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AssetItem {
    /// Bare string: a script `src` or stylesheet `href`.
    Shorthand(String),
    /// Full attribute object.
    Record(AttrRecord),
}

impl AssetItem {
    /// Resolve to a full record for the given kind.
    ///
    /// Empty records yield `None`. Shorthand only has a meaning for scripts
    /// and links; for any other kind it yields `None`.
    pub fn to_record(&self, kind: AssetKind) -> Option<AttrRecord> {
        match (self, kind) {
            (Self::Record(record), _) if record.is_empty() => None,
            (Self::Record(record), _) => Some(record.clone()),
            (Self::Shorthand(src), AssetKind::Scripts) => Some(AttrRecord::script(src.as_str())),
            (Self::Shorthand(href), AssetKind::Links) => Some(AttrRecord::stylesheet(href.as_str())),
            (Self::Shorthand(_), _) => None,
        }
    }
}

impl From<&str> for AssetItem {
    fn from(s: &str) -> Self {
        Self::Shorthand(s.to_string())
    }
}

impl From<AttrRecord> for AssetItem {
    fn from(record: AttrRecord) -> Self {
        Self::Record(record)
    }
}

// ============================================================================
// AssetBundle
// ============================================================================

/// Normalized content of one descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetBundle {
    /// Raw title, possibly a message key. Never blank when `Some`.
    pub title: Option<String>,
    pub meta: Vec<AttrRecord>,
    pub scripts: Vec<AttrRecord>,
    pub links: Vec<AttrRecord>,
}

impl AssetBundle {
    /// `true` when the bundle has nothing to render.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.meta.is_empty() && self.scripts.is_empty() && self.links.is_empty()
    }

    /// Records of a tag kind. `Title` has no records.
    pub fn records(&self, kind: AssetKind) -> &[AttrRecord] {
        match kind {
            AssetKind::Meta => &self.meta,
            AssetKind::Scripts => &self.scripts,
            AssetKind::Links => &self.links,
            AssetKind::Title => &[],
        }
    }
}
