//! Asset kind definitions.

use std::fmt;
use std::str::FromStr;

/// Kind of head asset, determines tag shape and cache partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetKind {
    /// `<title>` element (single value)
    Title,
    /// `<meta ... />` elements
    Meta,
    /// `<link ... />` elements
    Links,
    /// `<script ...></script>` elements
    Scripts,
}

impl AssetKind {
    /// All kinds in head output order.
    pub const ALL: [Self; 4] = [Self::Title, Self::Meta, Self::Links, Self::Scripts];

    /// Config/CLI name for this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Meta => "meta",
            Self::Links => "links",
            Self::Scripts => "scripts",
        }
    }

    /// Parse a comma-separated kind list (`"title, meta"`).
    ///
    /// Unknown names are ignored. An empty or all-unknown list yields every kind.
    pub fn parse_list(list: &str) -> Vec<Self> {
        let mut kinds: Vec<Self> = list
            .split(',')
            .filter_map(|s| s.parse().ok())
            .collect();
        kinds.sort();
        kinds.dedup();
        if kinds.is_empty() {
            kinds.extend(Self::ALL);
        }
        kinds
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "meta" | "metas" => Ok(Self::Meta),
            "link" | "links" => Ok(Self::Links),
            "script" | "scripts" => Ok(Self::Scripts),
            other => Err(format!("unknown asset kind `{other}`")),
        }
    }
}
