//! Caller-facing request and response types of the workflow API.
//!
//! Both API vintages share these shapes. Every response implements
//! `Default` so a transport can send the zero value next to an error.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::workflow::WorkflowState;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetWorkflowRequest {
    pub instance_id: String,
    pub workflow_component: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetWorkflowResponse {
    pub instance_id: String,
    pub workflow_name: String,
    pub created_at: Option<DateTime<Utc>>,
    pub last_updated_at: Option<DateTime<Utc>>,
    pub runtime_status: String,
    pub properties: HashMap<String, String>,
}

impl From<WorkflowState> for GetWorkflowResponse {
    fn from(state: WorkflowState) -> Self {
        Self {
            instance_id: state.instance_id,
            workflow_name: state.workflow_name,
            created_at: Some(state.created_at),
            last_updated_at: Some(state.last_updated_at),
            runtime_status: state.runtime_status,
            properties: state.properties,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartWorkflowRequest {
    pub instance_id: String,
    pub workflow_component: String,
    pub workflow_name: String,
    #[serde(default)]
    pub options: HashMap<String, String>,
    #[serde(default)]
    pub input: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartWorkflowResponse {
    pub instance_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminateWorkflowRequest {
    pub instance_id: String,
    pub workflow_component: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaiseEventWorkflowRequest {
    pub instance_id: String,
    pub workflow_component: String,
    pub event_name: String,
    #[serde(default)]
    pub event_data: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseWorkflowRequest {
    pub instance_id: String,
    pub workflow_component: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeWorkflowRequest {
    pub instance_id: String,
    pub workflow_component: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurgeWorkflowRequest {
    pub instance_id: String,
    pub workflow_component: String,
}

/// Acknowledgement for operations that return no payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}
