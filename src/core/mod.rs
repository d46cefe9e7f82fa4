//! Core types - pure abstractions shared across the codebase.

mod kind;
mod locale;
mod state;

pub use kind::AssetKind;
pub use locale::Locale;
pub use state::{is_shutdown, request_shutdown, setup_shutdown_handler, wait_for_shutdown};
