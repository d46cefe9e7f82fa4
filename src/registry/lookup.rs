//! Read surface: lookups by URL path, by bundle name, and of request-scoped
//! dynamic items.
//!
//! Path and name lookups go through the render cache; dynamic lookups never
//! touch it. No lookup fails: unknown targets yield empty lists and `None`
//! titles.

use std::sync::Arc;

use super::Registry;
use super::bundle::{AssetBundle, AssetItem};
use crate::cache::{Rendered, Scope, Slot};
use crate::core::{AssetKind, Locale};

/// Rendered tags, shared with the cache.
pub type Tags = Arc<[String]>;

fn empty() -> Tags {
    Arc::from(Vec::new())
}

impl Registry {
    // ========================================================================
    // By path
    // ========================================================================

    pub fn scripts_for_path(&self, path: &str, locale: &Locale, include_global: bool) -> Tags {
        self.tags_for_path(AssetKind::Scripts, path, locale, include_global)
    }

    pub fn meta_for_path(&self, path: &str, locale: &Locale, include_global: bool) -> Tags {
        self.tags_for_path(AssetKind::Meta, path, locale, include_global)
    }

    pub fn links_for_path(&self, path: &str, locale: &Locale, include_global: bool) -> Tags {
        self.tags_for_path(AssetKind::Links, path, locale, include_global)
    }

    /// Title of a path.
    ///
    /// Falls back to the global title when the path has a bundle without a
    /// title. A path with no bundle has no title.
    pub fn title_for_path(&self, path: &str, locale: &Locale, include_global: bool) -> Option<String> {
        let slot = Slot::new(AssetKind::Title, locale, include_global);
        if let Some(Rendered::Title(title)) = self.cache.get(Scope::Path, path, &slot) {
            return Some(title.to_string());
        }

        let epoch = self.cache.epoch();
        let bundle = self.store.path(path)?;
        let raw = match &bundle.title {
            Some(title) => Some(title.clone()),
            None if include_global => self.store.global().and_then(|g| g.title.clone()),
            None => None,
        };

        let title = self.renderer.title(raw.as_deref()?, locale)?;
        self.cache
            .insert(Scope::Path, path, slot, Rendered::Title(Arc::from(title.as_str())), epoch);
        Some(title)
    }

    /// Kind-generic path lookup: global records first, then the path's own.
    pub fn tags_for_path(&self, kind: AssetKind, path: &str, locale: &Locale, include_global: bool) -> Tags {
        let slot = Slot::new(kind, locale, include_global);
        if let Some(Rendered::Tags(tags)) = self.cache.get(Scope::Path, path, &slot) {
            return tags;
        }

        // read before the stores, so an eviction racing this render wins
        let epoch = self.cache.epoch();
        let mut tags = Vec::new();
        if include_global && let Some(global) = self.store.global() {
            self.render_into(&mut tags, kind, &global, locale);
        }
        if let Some(bundle) = self.store.path(path) {
            self.render_into(&mut tags, kind, &bundle, locale);
        }

        self.remember(Scope::Path, path, slot, tags, epoch)
    }

    // ========================================================================
    // By name
    // ========================================================================

    pub fn scripts_for_name(&self, name: &str, locale: &Locale) -> Tags {
        self.tags_for_name(AssetKind::Scripts, name, locale)
    }

    pub fn meta_for_name(&self, name: &str, locale: &Locale) -> Tags {
        self.tags_for_name(AssetKind::Meta, name, locale)
    }

    pub fn links_for_name(&self, name: &str, locale: &Locale) -> Tags {
        self.tags_for_name(AssetKind::Links, name, locale)
    }

    pub fn title_for_name(&self, name: &str, locale: &Locale) -> Option<String> {
        let slot = Slot::new(AssetKind::Title, locale, false);
        if let Some(Rendered::Title(title)) = self.cache.get(Scope::Name, name, &slot) {
            return Some(title.to_string());
        }

        let epoch = self.cache.epoch();
        let bundle = self.store.named(name)?;
        let title = self.renderer.title(bundle.title.as_deref()?, locale)?;
        self.cache
            .insert(Scope::Name, name, slot, Rendered::Title(Arc::from(title.as_str())), epoch);
        Some(title)
    }

    /// Kind-generic name lookup. Global content never merges into names.
    pub fn tags_for_name(&self, kind: AssetKind, name: &str, locale: &Locale) -> Tags {
        let slot = Slot::new(kind, locale, false);
        if let Some(Rendered::Tags(tags)) = self.cache.get(Scope::Name, name, &slot) {
            return tags;
        }

        let epoch = self.cache.epoch();
        let mut tags = Vec::new();
        if let Some(bundle) = self.store.named(name) {
            self.render_into(&mut tags, kind, &bundle, locale);
        }

        self.remember(Scope::Name, name, slot, tags, epoch)
    }

    // ========================================================================
    // Dynamic
    // ========================================================================

    pub fn dynamic_scripts(&self, items: &[AssetItem], locale: &Locale) -> Vec<String> {
        self.dynamic_tags(AssetKind::Scripts, items, locale)
    }

    /// Shorthand strings have no meaning for meta and are dropped.
    pub fn dynamic_meta(&self, items: &[AssetItem], locale: &Locale) -> Vec<String> {
        self.dynamic_tags(AssetKind::Meta, items, locale)
    }

    pub fn dynamic_links(&self, items: &[AssetItem], locale: &Locale) -> Vec<String> {
        self.dynamic_tags(AssetKind::Links, items, locale)
    }

    pub fn dynamic_title(&self, raw: &str, locale: &Locale) -> Option<String> {
        self.renderer.title(raw, locale)
    }

    /// Render caller-supplied items. No alias substitution, no caching.
    pub fn dynamic_tags(&self, kind: AssetKind, items: &[AssetItem], locale: &Locale) -> Vec<String> {
        items
            .iter()
            .filter_map(|item| item.to_record(kind))
            .filter_map(|record| self.renderer.tag(kind, &record, locale))
            .collect()
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn render_into(&self, out: &mut Vec<String>, kind: AssetKind, bundle: &AssetBundle, locale: &Locale) {
        out.extend(
            bundle
                .records(kind)
                .iter()
                .filter_map(|record| self.renderer.tag(kind, record, locale)),
        );
    }

    /// Freeze rendered tags, caching them unless empty.
    fn remember(&self, scope: Scope, target: &str, slot: Slot, tags: Vec<String>, epoch: u64) -> Tags {
        if tags.is_empty() {
            return empty();
        }
        let tags: Tags = Arc::from(tags);
        self.cache
            .insert(scope, target, slot, Rendered::Tags(Arc::clone(&tags)), epoch);
        tags
    }
}
