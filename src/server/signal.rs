// Shutdown signal handling. SIGTERM and SIGINT both trigger a graceful
// shutdown; everything else keeps its default disposition.

use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Start the shutdown signal handler.
///
/// Spawns a background task that waits for SIGTERM or SIGINT and wakes the
/// accept loop through `shutdown`. Uses `notify_one` so a signal arriving
/// before the loop starts waiting is not lost.
#[cfg(unix)]
pub fn start_signal_handler(shutdown: Arc<Notify>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut sigterm = signal(SignalKind::terminate()).expect("cannot install SIGTERM handler");
        let mut sigint = signal(SignalKind::interrupt()).expect("cannot install SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => logger::log_shutdown("SIGTERM"),
            _ = sigint.recv() => logger::log_shutdown("SIGINT"),
        }
        shutdown.notify_one();
    });
}

/// Ctrl+C is the only shutdown trigger off Unix.
#[cfg(not(unix))]
pub fn start_signal_handler(shutdown: Arc<Notify>) {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            logger::log_shutdown("Ctrl+C");
            shutdown.notify_one();
        }
    });
}
