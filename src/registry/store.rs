//! Bundle storage: one global slot, path-bound and named maps.
//!
//! Bundles are built completely before they are stored, so readers only ever
//! see whole bundles. A path listed by several descriptors points at the same
//! `Arc` within one descriptor; the last store wins across descriptors.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use dashmap::DashMap;

use super::bundle::AssetBundle;

#[derive(Debug, Default)]
pub struct BundleStore {
    global: ArcSwapOption<AssetBundle>,
    paths: DashMap<String, Arc<AssetBundle>>,
    named: DashMap<String, Arc<AssetBundle>>,
}

impl BundleStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // global
    // ------------------------------------------------------------------------

    pub fn global(&self) -> Option<Arc<AssetBundle>> {
        self.global.load_full()
    }

    pub fn set_global(&self, bundle: Arc<AssetBundle>) {
        self.global.store(Some(bundle));
    }

    // ------------------------------------------------------------------------
    // path-bound
    // ------------------------------------------------------------------------

    pub fn path(&self, path: &str) -> Option<Arc<AssetBundle>> {
        self.paths.get(path).map(|entry| Arc::clone(entry.value()))
    }

    pub fn set_path(&self, path: impl Into<String>, bundle: Arc<AssetBundle>) {
        self.paths.insert(path.into(), bundle);
    }

    /// All stored paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<_> = self.paths.iter().map(|e| e.key().clone()).collect();
        paths.sort();
        paths
    }

    // ------------------------------------------------------------------------
    // named
    // ------------------------------------------------------------------------

    pub fn named(&self, name: &str) -> Option<Arc<AssetBundle>> {
        self.named.get(name).map(|entry| Arc::clone(entry.value()))
    }

    pub fn set_named(&self, name: impl Into<String>, bundle: Arc<AssetBundle>) {
        self.named.insert(name.into(), bundle);
    }

    /// All stored names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.named.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}
