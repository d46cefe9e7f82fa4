//! Locale tags for message resolution and cache partitioning.

use std::fmt;
use std::sync::Arc;

/// Normalized locale tag (`en`, `en-US`, `zh-Hant-TW`).
///
/// Invariants:
/// - `_` separators are rewritten to `-`
/// - the language subtag is lowercase, a two-letter region subtag is uppercase
/// - the empty tag is the root locale
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Locale(Arc<str>);

impl Locale {
    /// Parse and normalize a locale tag.
    pub fn new(tag: &str) -> Self {
        let normalized = tag
            .trim()
            .split(['-', '_'])
            .filter(|part| !part.is_empty())
            .enumerate()
            .map(|(i, part)| match (i, part.len()) {
                (0, _) => part.to_ascii_lowercase(),
                (_, 2) => part.to_ascii_uppercase(),
                _ => part.to_string(),
            })
            .collect::<Vec<_>>()
            .join("-");
        Self(Arc::from(normalized))
    }

    /// The root locale (no language).
    pub fn root() -> Self {
        Self(Arc::from(""))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Language subtag (`en` for `en-US`).
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or_default()
    }

    /// Tags to try in order, most specific first.
    ///
    /// `zh-Hant-TW` → `["zh-Hant-TW", "zh-Hant", "zh"]`. The root locale has
    /// no fallbacks.
    pub fn fallbacks(&self) -> Vec<&str> {
        let mut tags = Vec::new();
        let mut current = self.as_str();
        while !current.is_empty() {
            tags.push(current);
            current = match current.rfind('-') {
                Some(idx) => &current[..idx],
                None => "",
            };
        }
        tags
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::root()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locale {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}
