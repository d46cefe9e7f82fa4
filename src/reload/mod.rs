//! Polling reload of config files.
//!
//! ```text
//! ┌──────── wait(interval) ◄─────────┐
//! ▼                                  │
//! sweep: changed mtimes + new files ─┴─► Registry::load_file
//! ```
//!
//! A sweep reloads every tracked file whose mtime moved forward, then loads
//! files that appeared under the configured sources since the last pass. The
//! loop runs on one background thread; [`ReloadHandle::stop`] ends it.

pub mod mtime;
pub mod pacer;

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{Context, Result};

pub use pacer::{Pacer, SignalPacer};

use crate::registry::{Registry, discover_sources, loader::is_global_file};
use crate::{debug, log};

/// Reload interval used when none is configured.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(2000);

/// Re-applies changed config files to a registry.
#[derive(Debug, Clone)]
pub struct Reloader {
    registry: Arc<Registry>,
    sources: Vec<PathBuf>,
}

impl Reloader {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            sources: Vec::new(),
        }
    }

    /// Sources scanned for files that were missing at startup.
    pub fn with_sources(mut self, sources: Vec<PathBuf>) -> Self {
        self.sources = sources;
        self
    }

    /// One pass. Returns the number of files (re)loaded.
    pub fn sweep(&self) -> usize {
        let mut files = self.registry.mtimes().changed();
        // global first: alias changes must land before dependents reload
        files.sort_by_key(|path| !is_global_file(path));

        files.extend(
            discover_sources(&self.sources)
                .into_iter()
                .filter(|path| path.exists() && !self.registry.mtimes().is_tracked(path)),
        );

        if files.is_empty() {
            debug!("reload"; "no asset config changed");
            return 0;
        }

        for file in &files {
            log!("reload"; "reloading asset config {}", file.display());
            self.registry.load_file(file);
        }
        files.len()
    }

    /// Sweep after every wait until the pacer says stop.
    pub fn run(&self, interval: Duration, pacer: &dyn Pacer) {
        while pacer.wait(interval) {
            self.sweep();
        }
        debug!("reload"; "reload loop stopped");
    }

    /// Run the loop on a background thread.
    pub fn spawn(self, interval: Duration) -> Result<ReloadHandle> {
        let pacer = Arc::new(SignalPacer::new());
        let thread = {
            let pacer = Arc::clone(&pacer);
            std::thread::Builder::new()
                .name("asset-reload".into())
                .spawn(move || self.run(interval, pacer.as_ref()))
                .context("failed to spawn reload thread")?
        };

        Ok(ReloadHandle {
            pacer,
            thread: Some(thread),
        })
    }
}

/// Owner of a running reload thread. Dropping it stops the thread.
#[derive(Debug)]
pub struct ReloadHandle {
    pacer: Arc<SignalPacer>,
    thread: Option<JoinHandle<()>>,
}

impl ReloadHandle {
    /// Signal the loop and wait for it to finish its current sweep.
    pub fn stop(&mut self) {
        self.pacer.stop();
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            log!("error"; "reload thread panicked");
        }
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for ReloadHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
