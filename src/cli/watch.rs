//! `watch`: reprint a head block whenever the registry changes it.

use std::io::{Write, stdout};
use std::time::Duration;

use anyhow::Result;

use head_assets::config::AssetsConfig;
use head_assets::core::{setup_shutdown_handler, wait_for_shutdown};
use head_assets::head::compose;
use head_assets::logger::{status_detach, status_error, status_success, status_unchanged};
use head_assets::manager::AssetManager;
use head_assets::reload::DEFAULT_INTERVAL;
use head_assets::log;

use super::{HeadArgs, plural_count};

pub fn watch(config: &AssetsConfig, args: &HeadArgs) -> Result<()> {
    setup_shutdown_handler()?;

    let dynamic = args.dynamic()?;
    let request = args.request();
    let interval = config.reload_interval().unwrap_or_else(|| {
        log!("warning"; "reloading is disabled in settings, polling every {}ms", DEFAULT_INTERVAL.as_millis());
        DEFAULT_INTERVAL
    });
    let config = AssetsConfig {
        reload_interval: i64::try_from(interval.as_millis()).unwrap_or(i64::MAX),
        ..config.clone()
    };

    let manager = AssetManager::new(&config);
    manager.initialize()?;
    status_unchanged(&format!(
        "watching {}, Ctrl+C to stop",
        plural_count(config.sources.len(), "source")
    ));
    status_detach();

    let mut last: Option<String> = None;
    // poll faster than the reload loop so changes show up on its next sweep
    let poll = (interval / 2).max(Duration::from_millis(50));

    loop {
        let html = compose(manager.registry(), &request, &dynamic).to_html();
        if last.as_deref() != Some(html.as_str()) {
            if html.is_empty() {
                status_error("head is empty", &format!("no assets for {}", args.path));
            } else if last.is_some() {
                status_success("head changed");
            }
            print!("{html}");
            stdout().flush().ok();
            status_detach();
            last = Some(html);
        }

        if wait_for_shutdown(poll) {
            break;
        }
    }

    manager.shutdown();
    log!("watch"; "stopped");
    Ok(())
}
