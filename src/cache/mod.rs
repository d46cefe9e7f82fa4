//! Render cache for assembled tag lists and titles.
//!
//! Keyed by target (a URL path or a bundle name) and then by [`Slot`]
//! (asset kind, locale, whether global assets were merged). Entries are only
//! ever added or removed as a whole target; a removal forces one re-render on
//! the next lookup. A disabled cache stores nothing.
//!
//! # Invalidation race
//!
//! A lookup may render from a bundle that a reload replaces before the result
//! is stored. Every removal bumps an epoch before it removes, and
//! [`RenderCache::insert`] only stores when the epoch it was handed is still
//! current, so such a stale result is dropped instead of outliving the reload.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use rustc_hash::FxHashMap;

use crate::core::{AssetKind, Locale};

/// Which target namespace an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Path,
    Name,
}

/// Variant of a target's rendered output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slot {
    pub kind: AssetKind,
    pub locale: Locale,
    pub include_global: bool,
}

impl Slot {
    pub fn new(kind: AssetKind, locale: &Locale, include_global: bool) -> Self {
        Self {
            kind,
            locale: locale.clone(),
            include_global,
        }
    }
}

/// Cached output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Tags(Arc<[String]>),
    Title(Arc<str>),
}

type Slots = FxHashMap<Slot, Rendered>;

#[derive(Debug, Default)]
pub struct RenderCache {
    enabled: bool,
    epoch: AtomicU64,
    paths: DashMap<String, Slots>,
    names: DashMap<String, Slots>,
}

impl RenderCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Default::default()
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn map(&self, scope: Scope) -> &DashMap<String, Slots> {
        match scope {
            Scope::Path => &self.paths,
            Scope::Name => &self.names,
        }
    }

    /// Current invalidation epoch. Read it before assembling a value to insert.
    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    pub fn get(&self, scope: Scope, target: &str, slot: &Slot) -> Option<Rendered> {
        if !self.enabled {
            return None;
        }
        self.map(scope)
            .get(target)
            .and_then(|slots| slots.get(slot).cloned())
    }

    /// Store a value assembled at `epoch`. Returns `true` if it was stored.
    pub fn insert(&self, scope: Scope, target: &str, slot: Slot, value: Rendered, epoch: u64) -> bool {
        if !self.enabled {
            return false;
        }
        let map = self.map(scope);
        let mut slots = map.entry(target.to_string()).or_default();
        // checked while holding the shard lock, so a concurrent remove either
        // rejects this insert or runs after it and removes it
        if self.epoch() != epoch {
            let vacant = slots.is_empty();
            drop(slots);
            if vacant {
                map.remove_if(target, |_, slots| slots.is_empty());
            }
            return false;
        }
        slots.insert(slot, value);
        true
    }

    /// Drop every entry of one target.
    pub fn remove(&self, scope: Scope, target: &str) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.map(scope).remove(target);
    }

    /// Drop everything.
    pub fn clear(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.paths.clear();
        self.names.clear();
    }

    /// Number of cached values across all targets.
    pub fn len(&self) -> usize {
        let count = |map: &DashMap<String, Slots>| map.iter().map(|e| e.value().len()).sum::<usize>();
        count(&self.paths) + count(&self.names)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
