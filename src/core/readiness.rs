//! Readiness gate awaited before every engine call.
//!
//! Workflow engines typically depend on other subsystems coming up first.
//! Calls arriving before that wait here until the host signals readiness or
//! the caller cancels.

use async_trait::async_trait;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::error::ApiError;

#[async_trait]
pub trait ReadinessGate: Send + Sync {
    /// Wait until the engine subsystem accepts calls.
    ///
    /// Returns `ApiError::Cancelled` if `cancel` fires first.
    async fn wait_ready(&self, cancel: &CancellationToken) -> Result<(), ApiError>;
}

/// Gate for hosts without a startup phase
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysReady;

#[async_trait]
impl ReadinessGate for AlwaysReady {
    async fn wait_ready(&self, cancel: &CancellationToken) -> Result<(), ApiError> {
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        Ok(())
    }
}

/// Gate that opens once its [`ReadyHandle`] is marked ready.
///
/// Dropping the handle before marking ready fails waiters with
/// `ApiError::EngineUnavailable`.
#[derive(Debug, Clone)]
pub struct ReadySignal {
    rx: watch::Receiver<bool>,
}

/// Host-side handle that opens a [`ReadySignal`]
#[derive(Debug)]
pub struct ReadyHandle {
    tx: watch::Sender<bool>,
}

impl ReadySignal {
    /// Create a closed gate and the handle that opens it
    pub fn new() -> (Self, ReadyHandle) {
        let (tx, rx) = watch::channel(false);
        (Self { rx }, ReadyHandle { tx })
    }

    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }
}

impl ReadyHandle {
    /// Open the gate. Waiters are released and later calls pass straight through.
    pub fn mark_ready(&self) {
        self.tx.send_replace(true);
    }
}

#[async_trait]
impl ReadinessGate for ReadySignal {
    async fn wait_ready(&self, cancel: &CancellationToken) -> Result<(), ApiError> {
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        if self.is_ready() {
            return Ok(());
        }

        debug!("Waiting for workflow engine readiness");
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return Ok(());
            }
            tokio::select! {
                _ = cancel.cancelled() => return Err(ApiError::Cancelled),
                changed = rx.changed() => {
                    // Handle dropped without ever becoming ready
                    if changed.is_err() {
                        return Err(ApiError::EngineUnavailable);
                    }
                }
            }
        }
    }
}
