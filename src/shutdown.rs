//! Process-wide shutdown signal.
//!
//! The bridge runs until an interrupt or termination signal arrives. That
//! trigger is modeled as an explicit set-once flag shared by reference, not
//! ambient global state. Loops observe it cooperatively at fixed polling
//! points: before each reconnect attempt, before each body line, and at
//! shutdown-sequence entry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{info, warn};

/// Cooperative cancellation flag.
///
/// Set exactly once, never reset. `set` is idempotent under repeated
/// signals. Reads are plain boolean checks with no compound invariants, so
/// no lock is needed.
#[derive(Debug, Default)]
pub struct ShutdownSignal {
    fired: AtomicBool,
    notify: Notify,
}

impl ShutdownSignal {
    /// Create a new, unset signal behind an `Arc` for sharing with the
    /// signal-watcher task and the supervisor.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Trip the signal. Idempotent.
    pub fn set(&self) {
        self.fired.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    /// Whether the signal has been tripped.
    pub fn is_set(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Completes once the signal is tripped.
    ///
    /// Completes immediately if `set` already happened, so it is safe to
    /// await at any time (e.g. inside `tokio::select!` against a pending
    /// body read or the reconnect sleep).
    pub async fn notified(&self) {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        // Register interest before re-checking the flag, otherwise a `set`
        // landing between the check and the await would be lost.
        notified.as_mut().enable();
        if self.is_set() {
            return;
        }
        notified.await;
    }
}

/// Spawn a watcher that maps SIGINT and SIGTERM to one `set` call.
///
/// Repeated signals after the first are harmless.
pub fn install_signal_handlers(shutdown: Arc<ShutdownSignal>) {
    tokio::spawn(async move {
        wait_for_signal().await;
        info!("Shutdown signal received");
        shutdown.set();
    });
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = match signal(SignalKind::terminate()) {
        Ok(term) => term,
        Err(e) => {
            warn!("Failed to install SIGTERM handler: {}", e);
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = term.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
