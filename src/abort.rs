use std::future::Future;
use std::io;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{sleep_until, Instant};

/// Abort signal sent when polling should stop.
/// Can be raised by anything holding an [`AbortHandle`] (Ctrl-C handler, tests).
#[derive(Debug, Clone, PartialEq)]
pub struct AbortSignal {
    pub reason: String,
}

#[derive(Debug)]
pub struct AbortHandle {
    tx: watch::Sender<Option<AbortSignal>>,
}

#[derive(Debug, Clone)]
pub struct AbortListener {
    rx: watch::Receiver<Option<AbortSignal>>,
}

pub fn abort_channel() -> (AbortHandle, AbortListener) {
    let (tx, rx) = watch::channel(None);
    (AbortHandle { tx }, AbortListener { rx })
}

impl AbortHandle {
    /// Raise the signal. The first reason wins.
    pub fn abort(&self, reason: impl Into<String>) {
        let reason = reason.into();
        self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(AbortSignal { reason });
            true
        });
    }
}

impl AbortListener {
    pub fn aborted(&self) -> Option<AbortSignal> {
        self.rx.borrow().clone()
    }

    /// Sleep for `duration`, waking early if the signal is raised.
    /// Returns the signal if sleeping was cut short.
    pub async fn sleep(&mut self, duration: Duration) -> Option<AbortSignal> {
        if let Some(signal) = self.aborted() {
            return Some(signal);
        }

        let deadline = Instant::now() + duration;
        loop {
            tokio::select! {
                _ = sleep_until(deadline) => return None,
                changed = self.rx.changed() => {
                    if changed.is_err() {
                        // Every handle is gone, nobody can abort any more.
                        sleep_until(deadline).await;
                        return None;
                    }
                    if let Some(signal) = self.aborted() {
                        return Some(signal);
                    }
                }
            }
        }
    }
}

/// Turn interrupts from `next_interrupt` into an abort on `handle`.
/// Returns `true` once a second interrupt arrives, `false` if listening fails.
pub async fn relay_interrupts<F, Fut>(handle: AbortHandle, mut next_interrupt: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    if let Err(e) = next_interrupt().await {
        log::warn!("Cannot listen for interrupts: {}", e);
        return false;
    }
    handle.abort("interrupted");
    log::info!("Interrupted, stopping after the current cycle (interrupt again to quit now)");

    next_interrupt().await.is_ok()
}
