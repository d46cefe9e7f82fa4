//! `check`: load every source once and summarize.

use anyhow::{Result, bail};

use head_assets::config::AssetsConfig;
use head_assets::log;
use head_assets::manager::AssetManager;

use super::plural_count;

pub fn check(config: &AssetsConfig) -> Result<()> {
    let config = AssetsConfig {
        reload_interval: 0,
        ..config.clone()
    };
    let manager = AssetManager::new(&config);
    let report = manager.initialize()?;

    let store = manager.registry().store();
    log!(
        "check";
        "{} loaded: {} global, {}, {}",
        plural_count(report.files, "file"),
        if store.global().is_some() { "with" } else { "no" },
        plural_count(store.paths().len(), "path"),
        plural_count(store.names().len(), "name")
    );
    log!(
        "check";
        "{} aliases, {} skipped",
        manager.registry().aliases().len(),
        plural_count(report.skipped, "descriptor")
    );

    for path in store.paths() {
        println!("path  {path}");
    }
    for name in store.names() {
        println!("name  {name}");
    }

    if report.failed > 0 {
        bail!("{} failed to load", plural_count(report.failed, "asset config"));
    }
    Ok(())
}
