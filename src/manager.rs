//! Lifecycle of a registry built from settings.
//!
//! `initialize()` loads every configured source once and, when a reload
//! interval is set, starts the reload thread. `shutdown()` stops it. Nothing
//! persists across restarts: a new manager reloads everything from disk.

use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;

use crate::config::AssetsConfig;
use crate::registry::{LoadReport, Registry};
use crate::reload::{ReloadHandle, Reloader};
use crate::render::MessageCatalog;
use crate::{debug, log};

pub struct AssetManager {
    config: AssetsConfig,
    registry: Arc<Registry>,
    reload: Mutex<Option<ReloadHandle>>,
}

impl AssetManager {
    /// Build an empty registry from settings. Nothing is loaded yet.
    pub fn new(config: &AssetsConfig) -> Self {
        let mut registry = Registry::new(config.root.clone()).with_caching(config.caching);
        if let Some(dir) = &config.messages {
            let catalog = MessageCatalog::load_dir(dir);
            debug!("messages"; "{} messages from {}", catalog.len(), dir.display());
            registry = registry.with_messages(Arc::new(catalog));
        }

        Self {
            config: config.clone(),
            registry: Arc::new(registry),
            reload: Mutex::new(None),
        }
    }

    /// Load all sources and start reloading if enabled.
    ///
    /// Calling it again reloads every source; a running reload thread is kept.
    pub fn initialize(&self) -> Result<LoadReport> {
        let report = self.registry.load_sources(&self.config.sources);
        log!(
            "load";
            "{} files, {} bundles, {} aliases",
            report.files, report.bundles(), report.aliases
        );

        let mut reload = self.reload.lock();
        if reload.is_none()
            && let Some(interval) = self.config.reload_interval()
        {
            let handle = Reloader::new(Arc::clone(&self.registry))
                .with_sources(self.config.sources.clone())
                .spawn(interval)?;
            debug!("reload"; "polling every {}ms", interval.as_millis());
            *reload = Some(handle);
        }

        Ok(report)
    }

    /// Stop the reload thread, if any. Idempotent.
    pub fn shutdown(&self) {
        if let Some(mut handle) = self.reload.lock().take() {
            handle.stop();
            debug!("reload"; "reload thread stopped");
        }
    }

    pub fn is_reloading(&self) -> bool {
        self.reload.lock().as_ref().is_some_and(ReloadHandle::is_running)
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn config(&self) -> &AssetsConfig {
        &self.config
    }
}

impl Drop for AssetManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}
