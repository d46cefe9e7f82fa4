//! Process-level shutdown state for the CLI.
//!
//! The registry itself never reads this; the `watch` command uses it to leave
//! its loop and call `AssetManager::shutdown()` on Ctrl+C.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam::channel::{self, Receiver, Sender};

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Channel pair used to wake blocked waiters on shutdown
static SHUTDOWN_CHANNEL: OnceLock<(Sender<()>, Receiver<()>)> = OnceLock::new();

fn shutdown_channel() -> &'static (Sender<()>, Receiver<()>) {
    SHUTDOWN_CHANNEL.get_or_init(|| channel::bounded(1))
}

/// Setup the global Ctrl+C handler. Call once at program start.
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(request_shutdown)
        .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Mark shutdown as requested and wake anyone blocked in [`wait_for_shutdown`].
pub fn request_shutdown() {
    SHUTDOWN.store(true, Ordering::SeqCst);
    let _ = shutdown_channel().0.try_send(());
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}

/// Block for at most `timeout`. Returns `true` if shutdown was requested.
pub fn wait_for_shutdown(timeout: std::time::Duration) -> bool {
    if is_shutdown() {
        return true;
    }
    let _ = shutdown_channel().1.recv_timeout(timeout);
    is_shutdown()
}
