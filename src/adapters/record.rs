//! Per-instance state shared by the bundled engines.
//!
//! State transitions are pure so the in-memory and file-backed engines
//! behave identically; they only differ in where the record lives.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{RaiseEventRequest, RuntimeStatus, StartRequest, WorkflowState};

use super::{EngineError, EngineResult};

pub const PROPERTY_INPUT: &str = "workflow.input";
pub const PROPERTY_LAST_EVENT: &str = "workflow.last_event";
pub const PROPERTY_EVENTS_RECEIVED: &str = "workflow.events_received";
const OPTION_PREFIX: &str = "option.";

/// A workflow instance as stored by the bundled engines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowRecord {
    pub instance_id: String,
    pub workflow_name: String,
    pub status: RuntimeStatus,
    pub created_at: DateTime<Utc>,
    pub last_updated_at: DateTime<Utc>,
    #[serde(default)]
    pub properties: HashMap<String, String>,
    #[serde(default)]
    pub events_received: u64,
}

impl WorkflowRecord {
    /// Create a running instance from a start request
    pub fn start(req: &StartRequest) -> Self {
        let now = Utc::now();
        let mut properties: HashMap<String, String> = req
            .options
            .iter()
            .map(|(k, v)| (format!("{}{}", OPTION_PREFIX, k), v.clone()))
            .collect();
        if !req.workflow_input.is_empty() {
            properties.insert(
                PROPERTY_INPUT.to_string(),
                String::from_utf8_lossy(&req.workflow_input).into_owned(),
            );
        }

        Self {
            instance_id: req.instance_id.clone(),
            workflow_name: req.workflow_name.clone(),
            status: RuntimeStatus::Running,
            created_at: now,
            last_updated_at: now,
            properties,
            events_received: 0,
        }
    }

    /// A new start may only replace an instance that has finished
    pub fn ensure_replaceable(&self) -> EngineResult<()> {
        if self.status.is_terminal() {
            Ok(())
        } else {
            Err(EngineError::AlreadyExists(self.instance_id.clone()))
        }
    }

    pub fn raise_event(&mut self, req: &RaiseEventRequest) -> EngineResult<()> {
        self.ensure_active("sent events")?;
        self.events_received += 1;
        self.properties
            .insert(PROPERTY_LAST_EVENT.to_string(), req.event_name.clone());
        self.properties.insert(
            PROPERTY_EVENTS_RECEIVED.to_string(),
            self.events_received.to_string(),
        );
        self.touch();
        Ok(())
    }

    /// Returns whether the status changed
    pub fn suspend(&mut self) -> EngineResult<bool> {
        self.ensure_active("paused")?;
        if self.status == RuntimeStatus::Suspended {
            return Ok(false);
        }
        self.status = RuntimeStatus::Suspended;
        self.touch();
        Ok(true)
    }

    /// Returns whether the status changed
    pub fn resume(&mut self) -> EngineResult<bool> {
        self.ensure_active("resumed")?;
        if self.status != RuntimeStatus::Suspended {
            return Ok(false);
        }
        self.status = RuntimeStatus::Running;
        self.touch();
        Ok(true)
    }

    /// Terminating a finished instance is a no-op. Returns whether the status changed.
    pub fn terminate(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = RuntimeStatus::Terminated;
        self.touch();
        true
    }

    /// Only finished instances may be purged
    pub fn ensure_purgeable(&self) -> EngineResult<()> {
        if self.status.is_terminal() {
            Ok(())
        } else {
            Err(self.invalid_state("purged"))
        }
    }

    pub fn state(&self) -> WorkflowState {
        WorkflowState {
            instance_id: self.instance_id.clone(),
            workflow_name: self.workflow_name.clone(),
            created_at: self.created_at,
            last_updated_at: self.last_updated_at,
            runtime_status: self.status.to_string(),
            properties: self.properties.clone(),
        }
    }

    fn ensure_active(&self, operation: &'static str) -> EngineResult<()> {
        if self.status.is_terminal() {
            return Err(self.invalid_state(operation));
        }
        Ok(())
    }

    fn invalid_state(&self, operation: &'static str) -> EngineError {
        EngineError::InvalidState {
            instance_id: self.instance_id.clone(),
            status: self.status,
            operation,
        }
    }

    fn touch(&mut self) {
        self.last_updated_at = Utc::now();
    }
}
