//! # Shutdown Controller
//!
//! Owns the process-wide run flag. Signal handlers and the shutdown command are the
//! writers; the supervisor reads it once per loop iteration and wakes from its sleeps
//! when it flips.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::strings::logs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    Interrupt,
    Terminate,
    UserCommand,
}

/// Cloneable handle to the run flag. `true` in the channel means "stop".
#[derive(Debug, Clone)]
pub struct ShutdownController {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownController {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn is_running(&self) -> bool {
        !*self.tx.borrow()
    }

    /// Flips the flag. Only the first request has any effect; returns whether this
    /// call was the one that flipped it.
    pub fn request_shutdown(&self, reason: ShutdownReason) -> bool {
        let flipped = self.tx.send_if_modified(|stopped| {
            if *stopped {
                false
            } else {
                *stopped = true;
                true
            }
        });

        if flipped {
            match reason {
                ShutdownReason::Interrupt => tracing::warn!("{}", logs::SIGINT),
                ShutdownReason::Terminate => tracing::warn!("{}", logs::SIGTERM),
                ShutdownReason::UserCommand => tracing::info!("{}", logs::USER_EXIT),
            }
        } else {
            tracing::debug!(?reason, "Shutdown already requested");
        }
        flipped
    }

    /// Sleeps for `duration`, returning early if shutdown is requested meanwhile.
    pub async fn pause(&self, duration: Duration) {
        let mut rx = self.tx.subscribe();
        if *rx.borrow_and_update() {
            return;
        }
        tokio::select! {
            _ = tokio::time::sleep(duration) => {}
            _ = rx.changed() => {}
        }
    }

    /// Hooks SIGINT and SIGTERM. Both map to a graceful shutdown request; repeats
    /// are ignored by `request_shutdown`.
    #[cfg(unix)]
    pub fn install_signal_handlers(&self) -> anyhow::Result<JoinHandle<()>> {
        use anyhow::Context;
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigint = signal(SignalKind::interrupt())
            .map_err(|e| anyhow::anyhow!(logs::shutdown_fail(&e.to_string())))
            .context("SIGINT")?;
        let mut sigterm = signal(SignalKind::terminate())
            .map_err(|e| anyhow::anyhow!(logs::shutdown_fail(&e.to_string())))
            .context("SIGTERM")?;

        let controller = self.clone();
        Ok(tokio::spawn(async move {
            loop {
                let reason = tokio::select! {
                    Some(()) = sigint.recv() => ShutdownReason::Interrupt,
                    Some(()) = sigterm.recv() => ShutdownReason::Terminate,
                    else => break,
                };
                controller.request_shutdown(reason);
            }
        }))
    }

    #[cfg(not(unix))]
    pub fn install_signal_handlers(&self) -> anyhow::Result<JoinHandle<()>> {
        let controller = self.clone();
        Ok(tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                controller.request_shutdown(ShutdownReason::Interrupt);
            }
            tracing::error!("{}", logs::shutdown_fail("ctrl-c listener closed"));
        }))
    }
}
