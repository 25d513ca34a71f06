//! File-backed workflow engine.
//!
//! Each instance is stored as a JSON document under the state directory.
//! File names are the SHA-256 of the instance id so that any id a caller
//! sends can be looked up safely. Writes go through a temp file and a rename.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::{
    GetRequest, PauseRequest, PurgeRequest, RaiseEventRequest, ResumeRequest, StartRequest,
    StartResponse, StateResponse, TerminateRequest,
};

use super::record::WorkflowRecord;
use super::{check_cancelled, EngineError, EngineResult, WorkflowComponent};

/// Workflow engine persisting instances as JSON files
pub struct FileEngine {
    state_dir: PathBuf,

    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileEngine {
    /// Open (and create if needed) an engine rooted at `state_dir`
    pub async fn open(state_dir: impl Into<PathBuf>) -> Result<Self> {
        let state_dir = state_dir.into();
        fs::create_dir_all(&state_dir)
            .await
            .with_context(|| format!("Failed to create state directory: {}", state_dir.display()))?;

        Ok(Self {
            state_dir,
            write_lock: Mutex::new(()),
        })
    }

    /// Directory holding the instance documents
    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    fn record_path(&self, instance_id: &str) -> PathBuf {
        let digest = Sha256::digest(instance_id.as_bytes());
        self.state_dir.join(format!("{}.json", hex::encode(digest)))
    }

    async fn load(&self, instance_id: &str) -> EngineResult<WorkflowRecord> {
        let path = self.record_path(instance_id);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(EngineError::NotFound)
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("Failed to read instance file: {}", path.display()))
                    .into())
            }
        };

        let record: WorkflowRecord = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse instance file: {}", path.display()))?;

        // A digest collision is not our instance
        if record.instance_id != instance_id {
            return Err(EngineError::NotFound);
        }
        Ok(record)
    }

    async fn store(&self, record: &WorkflowRecord) -> Result<()> {
        let path = self.record_path(&record.instance_id);
        let tmp_path = path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(record).context("Failed to serialize instance")?;
        fs::write(&tmp_path, json)
            .await
            .with_context(|| format!("Failed to write instance file: {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &path)
            .await
            .with_context(|| format!("Failed to replace instance file: {}", path.display()))?;

        Ok(())
    }

    async fn remove(&self, instance_id: &str) -> Result<()> {
        let path = self.record_path(instance_id);
        fs::remove_file(&path)
            .await
            .with_context(|| format!("Failed to remove instance file: {}", path.display()))
    }

    /// Load, mutate and persist an existing instance
    async fn update<T>(
        &self,
        instance_id: &str,
        f: impl FnOnce(&mut WorkflowRecord) -> EngineResult<T>,
    ) -> EngineResult<T> {
        let _guard = self.write_lock.lock().await;
        let mut record = self.load(instance_id).await?;
        let result = f(&mut record)?;
        self.store(&record).await?;
        Ok(result)
    }
}

#[async_trait]
impl WorkflowComponent for FileEngine {
    fn name(&self) -> &str {
        "file"
    }

    async fn get(
        &self,
        req: &GetRequest,
        cancel: &CancellationToken,
    ) -> EngineResult<StateResponse> {
        check_cancelled(cancel)?;
        let record = self.load(&req.instance_id).await?;
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
        let _guard = self.write_lock.lock().await;

        match self.load(&req.instance_id).await {
            Ok(existing) => existing.ensure_replaceable()?,
            Err(EngineError::NotFound) => {}
            Err(e) => return Err(e),
        }

        self.store(&WorkflowRecord::start(req)).await?;
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
        let _guard = self.write_lock.lock().await;
        let record = self.load(&req.instance_id).await?;
        record.ensure_purgeable()?;
        self.remove(&req.instance_id).await?;
        info!(instance_id = %req.instance_id, "Workflow purged");
        Ok(())
    }
}
