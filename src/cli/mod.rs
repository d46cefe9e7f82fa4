//! Command-line interface module.

mod args;
pub mod check;
pub mod render;
pub mod watch;

pub use args::{Cli, Commands, HeadArgs};

/// Format count with noun, handling pluralization
fn plural_count(count: usize, noun: &str) -> String {
    format!("{count} {noun}{}", if count == 1 { "" } else { "s" })
}
