//! Reloadable registry of html `<head>` assets.
//!
//! JSON descriptor files declare titles, meta tags, stylesheets and scripts
//! per URL path, per logical name, or globally. A [`Registry`] loads them,
//! substitutes aliases, renders tags on demand (optionally cached) and picks
//! up file changes through a polling [`reload::Reloader`].
//!
//! ```ignore
//! let manager = AssetManager::new(&AssetsConfig::load(Path::new("assets.toml"))?);
//! manager.initialize()?;
//! let scripts = manager.registry().scripts_for_path("/home", &Locale::new("en"), true);
//! ```

pub mod cache;
pub mod config;
pub mod core;
pub mod head;
pub mod logger;
pub mod manager;
pub mod registry;
pub mod reload;
pub mod render;

pub use config::AssetsConfig;
pub use core::{AssetKind, Locale};
pub use head::{DynamicAssets, HeadOutput, HeadRequest, compose};
pub use manager::AssetManager;
pub use registry::{AssetBundle, AssetItem, AttrRecord, LoadReport, Registry};
pub use render::{MessageCatalog, MessageSource, NoMessages, TagRenderer};
