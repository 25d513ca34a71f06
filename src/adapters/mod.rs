//! Workflow engine components.
//!
//! A component is a named workflow engine the API dispatches to. The API
//! only ever sees the [`WorkflowComponent`] capability; the bundled
//! [`MemoryEngine`] and [`FileEngine`] are reference implementations used
//! by the CLI and the tests.

pub mod file;
pub mod memory;
pub mod record;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::domain::{
    GetRequest, PauseRequest, PurgeRequest, RaiseEventRequest, ResumeRequest, RuntimeStatus,
    StartRequest, StartResponse, StateResponse, TerminateRequest,
};

// Re-export the bundled engines
pub use file::FileEngine;
pub use memory::MemoryEngine;
pub use record::WorkflowRecord;

/// Errors reported by a workflow engine component
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine has no instance with the requested id
    #[error("workflow instance not found")]
    NotFound,

    #[error("workflow instance '{0}' already exists")]
    AlreadyExists(String),

    #[error("workflow instance '{instance_id}' is {status} and cannot be {operation}")]
    InvalidState {
        instance_id: String,
        status: RuntimeStatus,
        operation: &'static str,
    },

    #[error("operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EngineError {
    /// Whether this is the engine's "instance does not exist" sentinel
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Capability exposed by a workflow engine component.
///
/// The token carries the caller's cancellation; what an engine does with an
/// in-flight call once it fires is up to the engine.
#[async_trait]
pub trait WorkflowComponent: Send + Sync {
    /// Human-readable engine kind
    fn name(&self) -> &str;

    async fn get(&self, req: &GetRequest, cancel: &CancellationToken)
        -> EngineResult<StateResponse>;

    async fn start(
        &self,
        req: &StartRequest,
        cancel: &CancellationToken,
    ) -> EngineResult<StartResponse>;

    async fn terminate(&self, req: &TerminateRequest, cancel: &CancellationToken)
        -> EngineResult<()>;

    async fn raise_event(
        &self,
        req: &RaiseEventRequest,
        cancel: &CancellationToken,
    ) -> EngineResult<()>;

    async fn pause(&self, req: &PauseRequest, cancel: &CancellationToken) -> EngineResult<()>;

    async fn resume(&self, req: &ResumeRequest, cancel: &CancellationToken) -> EngineResult<()>;

    async fn purge(&self, req: &PurgeRequest, cancel: &CancellationToken) -> EngineResult<()>;
}

/// Bail out of an engine call when the caller has already gone away
pub(crate) fn check_cancelled(cancel: &CancellationToken) -> EngineResult<()> {
    if cancel.is_cancelled() {
        return Err(EngineError::Cancelled);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_sentinel() {
        assert!(EngineError::NotFound.is_not_found());
        assert!(!EngineError::Cancelled.is_not_found());
        assert!(!EngineError::Other(anyhow::anyhow!("instance not found")).is_not_found());
    }

    #[test]
    fn test_invalid_state_message() {
        let err = EngineError::InvalidState {
            instance_id: "wf-1".to_string(),
            status: RuntimeStatus::Terminated,
            operation: "paused",
        };
        assert_eq!(
            err.to_string(),
            "workflow instance 'wf-1' is TERMINATED and cannot be paused"
        );
    }
}
