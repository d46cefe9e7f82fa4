//! Asset registry: the shared state behind every lookup.
//!
//! ```text
//! config files ──load_file──► AliasTable ─┐
//!                             BundleStore ├──► lookups ──► TagRenderer
//!                             ModTimeIndex│        ▲
//!                                         └──► RenderCache
//! ```
//!
//! One [`Registry`] owns all stores. Lookups read them concurrently while the
//! reload thread replaces bundles and evicts cache entries.

pub mod alias;
pub mod bundle;
pub mod loader;
pub mod lookup;
pub mod store;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use alias::AliasTable;
pub use bundle::{AssetBundle, AssetItem, AttrRecord, is_blank};
pub use loader::{GLOBAL_FILE, LoadError, LoadReport, discover_sources};
pub use store::BundleStore;

use crate::cache::RenderCache;
use crate::reload::mtime::ModTimeIndex;
use crate::render::{MessageSource, TagRenderer};

/// Every store the loader writes and the lookups read.
#[derive(Debug)]
pub struct Registry {
    aliases: AliasTable,
    store: BundleStore,
    cache: RenderCache,
    mtimes: ModTimeIndex,
    renderer: TagRenderer,
}

impl Registry {
    /// Empty registry with caching off. `root` is the embed directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            aliases: AliasTable::new(),
            store: BundleStore::new(),
            cache: RenderCache::new(false),
            mtimes: ModTimeIndex::new(),
            renderer: TagRenderer::new(root),
        }
    }

    pub fn with_caching(mut self, enabled: bool) -> Self {
        self.cache = RenderCache::new(enabled);
        self
    }

    pub fn with_messages(mut self, messages: Arc<dyn MessageSource>) -> Self {
        self.renderer = self.renderer.with_messages(messages);
        self
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn store(&self) -> &BundleStore {
        &self.store
    }

    pub fn cache(&self) -> &RenderCache {
        &self.cache
    }

    pub fn mtimes(&self) -> &ModTimeIndex {
        &self.mtimes
    }

    pub fn renderer(&self) -> &TagRenderer {
        &self.renderer
    }

    pub fn root(&self) -> &Path {
        self.renderer.root()
    }
}
