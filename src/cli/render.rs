//! `render`: print one head block.

use anyhow::Result;

use head_assets::config::AssetsConfig;
use head_assets::head::compose;
use head_assets::log;
use head_assets::manager::AssetManager;

use super::HeadArgs;

pub fn render(config: &AssetsConfig, args: &HeadArgs) -> Result<()> {
    let dynamic = args.dynamic()?;
    let config = AssetsConfig {
        reload_interval: 0,
        ..config.clone()
    };
    let manager = AssetManager::new(&config);
    manager.initialize()?;

    let head = compose(manager.registry(), &args.request(), &dynamic);
    if head.is_empty() {
        log!("warning"; "no head assets for {}", args.path);
    }
    print!("{}", head.to_html());
    Ok(())
}
