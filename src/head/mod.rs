//! Head block composition.
//!
//! Combines registry lookups with request-scoped dynamic assets into the
//! tags written into a page's `<head>`:
//!
//! - **types** mode: lookups by request path for a subset of kinds, followed
//!   by dynamic items (a non-blank dynamic title replaces the path title)
//! - **names** mode: named bundles concatenated in order, first title wins,
//!   dynamic items ignored
//!
//! Output order is always title, meta, links, scripts.

use serde::Deserialize;

use crate::core::{AssetKind, Locale};
use crate::registry::{AssetItem, Registry, is_blank};

/// Request-scoped assets supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DynamicAssets {
    pub title: Option<String>,
    pub meta: Vec<AssetItem>,
    pub links: Vec<AssetItem>,
    pub scripts: Vec<AssetItem>,
}

impl DynamicAssets {
    fn items(&self, kind: AssetKind) -> &[AssetItem] {
        match kind {
            AssetKind::Meta => &self.meta,
            AssetKind::Links => &self.links,
            AssetKind::Scripts => &self.scripts,
            AssetKind::Title => &[],
        }
    }
}

/// What to compose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Kinds looked up by request path.
    Types(Vec<AssetKind>),
    /// Named bundles, in order.
    Names(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadRequest {
    pub path: String,
    pub locale: Locale,
    pub selection: Selection,
    pub include_global: bool,
    pub include_dynamic: bool,
}

impl HeadRequest {
    /// Path lookup for a comma-separated kind list; empty means all kinds.
    pub fn types(path: impl Into<String>, locale: Locale, types: &str) -> Self {
        Self::new(path.into(), locale, Selection::Types(AssetKind::parse_list(types)))
    }

    /// Named lookup for a comma-separated name list.
    pub fn names(locale: Locale, names: &str) -> Self {
        let names = names
            .split(',')
            .map(|n| n.trim().to_lowercase())
            .filter(|n| !n.is_empty())
            .collect();
        Self::new(String::new(), locale, Selection::Names(names))
    }

    fn new(path: String, locale: Locale, selection: Selection) -> Self {
        Self {
            path,
            locale,
            selection,
            include_global: true,
            include_dynamic: true,
        }
    }

    pub fn with_global(mut self, include: bool) -> Self {
        self.include_global = include;
        self
    }

    pub fn with_dynamic(mut self, include: bool) -> Self {
        self.include_dynamic = include;
        self
    }
}

/// Composed head tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadOutput {
    pub title: Option<String>,
    pub meta: Vec<String>,
    pub links: Vec<String>,
    pub scripts: Vec<String>,
}

impl HeadOutput {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.meta.is_empty() && self.links.is_empty() && self.scripts.is_empty()
    }

    /// One tag per line, each line newline-terminated.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        let tags = self
            .title
            .iter()
            .chain(&self.meta)
            .chain(&self.links)
            .chain(&self.scripts);
        for tag in tags {
            html.push_str(tag);
            html.push('\n');
        }
        html
    }

    fn tags_mut(&mut self, kind: AssetKind) -> Option<&mut Vec<String>> {
        match kind {
            AssetKind::Meta => Some(&mut self.meta),
            AssetKind::Links => Some(&mut self.links),
            AssetKind::Scripts => Some(&mut self.scripts),
            AssetKind::Title => None,
        }
    }
}

/// Compose a head block. Never fails; missing content is simply absent.
pub fn compose(registry: &Registry, request: &HeadRequest, dynamic: &DynamicAssets) -> HeadOutput {
    match &request.selection {
        Selection::Types(kinds) => compose_types(registry, request, kinds, dynamic),
        Selection::Names(names) => compose_names(registry, &request.locale, names),
    }
}

fn compose_types(
    registry: &Registry,
    request: &HeadRequest,
    kinds: &[AssetKind],
    dynamic: &DynamicAssets,
) -> HeadOutput {
    let HeadRequest {
        path,
        locale,
        include_global,
        include_dynamic,
        ..
    } = request;
    let mut out = HeadOutput::default();

    for &kind in kinds {
        if kind == AssetKind::Title {
            let dynamic_title = include_dynamic
                .then(|| dynamic.title.as_deref())
                .flatten()
                .filter(|t| !is_blank(t))
                .and_then(|t| registry.dynamic_title(t, locale));
            out.title = dynamic_title.or_else(|| registry.title_for_path(path, locale, *include_global));
            continue;
        }

        let Some(tags) = out.tags_mut(kind) else {
            continue;
        };
        tags.extend(registry.tags_for_path(kind, path, locale, *include_global).iter().cloned());
        if *include_dynamic {
            tags.extend(registry.dynamic_tags(kind, dynamic.items(kind), locale));
        }
    }

    out
}

fn compose_names(registry: &Registry, locale: &Locale, names: &[String]) -> HeadOutput {
    let mut out = HeadOutput::default();

    for name in names {
        if out.title.is_none() {
            out.title = registry.title_for_name(name, locale);
        }
        for kind in [AssetKind::Meta, AssetKind::Links, AssetKind::Scripts] {
            if let Some(tags) = out.tags_mut(kind) {
                tags.extend(registry.tags_for_name(kind, name, locale).iter().cloned());
            }
        }
    }

    out
}
