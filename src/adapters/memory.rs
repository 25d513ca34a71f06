//! In-process workflow engine.
//!
//! Keeps every instance in a map for the lifetime of the process. Useful for
//! tests and for components that do not need to survive a restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::{
    GetRequest, PauseRequest, PurgeRequest, RaiseEventRequest, ResumeRequest, StartRequest,
    StartResponse, StateResponse, TerminateRequest,
};

use super::record::WorkflowRecord;
use super::{check_cancelled, EngineError, EngineResult, WorkflowComponent};

/// Workflow engine backed by an in-memory map
#[derive(Default)]
pub struct MemoryEngine {
    instances: RwLock<HashMap<String, WorkflowRecord>>,
}

impl MemoryEngine {
    /// Create an empty engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of instances currently held
    pub async fn len(&self) -> usize {
        self.instances.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.instances.read().await.is_empty()
    }

    /// Apply a mutation to an existing instance
    async fn update<T>(
        &self,
        instance_id: &str,
        f: impl FnOnce(&mut WorkflowRecord) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let mut instances = self.instances.write().await;
        let record = instances.get_mut(instance_id).ok_or(EngineError::NotFound)?;
        f(record)
    }
}

#[async_trait]
impl WorkflowComponent for MemoryEngine {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(
        &self,
        req: &GetRequest,
        cancel: &CancellationToken,
    ) -> EngineResult<StateResponse> {
        check_cancelled(cancel)?;
        let instances = self.instances.read().await;
        let record = instances.get(&req.instance_id).ok_or(EngineError::NotFound)?;
        Ok(StateResponse {
            workflow: record.state(),
        })
    }

    async fn start(
        &self,
        req: &StartRequest,
        cancel: &CancellationToken,
    ) -> EngineResult<StartResponse> {
        check_cancelled(cancel)?;
        let mut instances = self.instances.write().await;
        if let Some(existing) = instances.get(&req.instance_id) {
            existing.ensure_replaceable()?;
        }

        instances.insert(req.instance_id.clone(), WorkflowRecord::start(req));
        info!(instance_id = %req.instance_id, workflow = %req.workflow_name, "Workflow started");

        Ok(StartResponse {
            instance_id: req.instance_id.clone(),
        })
    }

    async fn terminate(
        &self,
        req: &TerminateRequest,
        cancel: &CancellationToken,
    ) -> EngineResult<()> {
        check_cancelled(cancel)?;
        let changed = self
            .update(&req.instance_id, |record| Ok(record.terminate()))
            .await?;
        debug!(instance_id = %req.instance_id, changed, "Workflow terminated");
        Ok(())
    }

    async fn raise_event(
        &self,
        req: &RaiseEventRequest,
        cancel: &CancellationToken,
    ) -> EngineResult<()> {
        check_cancelled(cancel)?;
        self.update(&req.instance_id, |record| record.raise_event(req))
            .await?;
        debug!(instance_id = %req.instance_id, event = %req.event_name, "Event delivered");
        Ok(())
    }

    async fn pause(&self, req: &PauseRequest, cancel: &CancellationToken) -> EngineResult<()> {
        check_cancelled(cancel)?;
        let changed = self
            .update(&req.instance_id, |record| record.suspend())
            .await?;
        debug!(instance_id = %req.instance_id, changed, "Workflow paused");
        Ok(())
    }

    async fn resume(&self, req: &ResumeRequest, cancel: &CancellationToken) -> EngineResult<()> {
        check_cancelled(cancel)?;
        let changed = self
            .update(&req.instance_id, |record| record.resume())
            .await?;
        debug!(instance_id = %req.instance_id, changed, "Workflow resumed");
        Ok(())
    }

    async fn purge(&self, req: &PurgeRequest, cancel: &CancellationToken) -> EngineResult<()> {
        check_cancelled(cancel)?;
        let mut instances = self.instances.write().await;
        let record = instances.get(&req.instance_id).ok_or(EngineError::NotFound)?;
        record.ensure_purgeable()?;
        instances.remove(&req.instance_id);
        info!(instance_id = %req.instance_id, "Workflow purged");
        Ok(())
    }
}
