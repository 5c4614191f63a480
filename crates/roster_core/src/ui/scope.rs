//! Lifecycle-bound cancellation for screen tasks.
//!
//! # Responsibility
//! - Tie background tasks and awaited actions to a screen's visible lifetime.
//!
//! # Invariants
//! - Cancellation is one-way; a cancelled scope never resumes.
//! - Dropping a scope cancels it.
//! - Futures raced against a token are dropped on cancellation, so no code
//!   after their await points runs.

use std::future::Future;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Cloneable view of a scope's cancellation state.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the owning scope is cancelled or dropped.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Drives `fut` unless cancellation wins first.
    ///
    /// Returns `None` when cancelled; `fut` is dropped at its current await point.
    pub async fn run_until_cancelled<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            _ = self.cancelled() => None,
            output = fut => Some(output),
        }
    }
}

/// Owner of a cancellation signal, usually one per screen or modal.
#[derive(Debug)]
pub struct LifecycleScope {
    cancel_tx: watch::Sender<bool>,
}

impl Default for LifecycleScope {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleScope {
    pub fn new() -> Self {
        let (cancel_tx, _) = watch::channel(false);
        Self { cancel_tx }
    }

    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.cancel_tx.subscribe(),
        }
    }

    pub fn cancel(&self) {
        self.cancel_tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel_tx.borrow()
    }

    /// Spawns `fut` on the runtime; it is dropped when the scope is cancelled.
    pub fn launch<F>(&self, fut: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.token();
        tokio::spawn(async move {
            let _ = token.run_until_cancelled(fut).await;
        })
    }

    /// Awaits `fut` in place, abandoning it if the scope is cancelled.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        self.token().run_until_cancelled(fut).await
    }
}

impl Drop for LifecycleScope {
    fn drop(&mut self) {
        self.cancel();
    }
}
