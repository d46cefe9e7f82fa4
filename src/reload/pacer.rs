//! Waiting between reload sweeps.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};

/// Decides how long the reload loop sleeps and when it stops.
pub trait Pacer: Send + Sync {
    /// Wait up to `interval`. Returns `false` when the loop should stop.
    fn wait(&self, interval: Duration) -> bool;
}

/// Sleeps on a channel so [`SignalPacer::stop`] wakes the loop at once.
#[derive(Debug)]
pub struct SignalPacer {
    stopped: AtomicBool,
    tx: Sender<()>,
    rx: Receiver<()>,
}

impl SignalPacer {
    pub fn new() -> Self {
        let (tx, rx) = channel::bounded(1);
        Self {
            stopped: AtomicBool::new(false),
            tx,
            rx,
        }
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        let _ = self.tx.try_send(());
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

impl Default for SignalPacer {
    fn default() -> Self {
        Self::new()
    }
}

impl Pacer for SignalPacer {
    fn wait(&self, interval: Duration) -> bool {
        if self.is_stopped() {
            return false;
        }
        match self.rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => !self.is_stopped(),
            Ok(()) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }
}
