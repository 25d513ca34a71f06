//! Domain types for the flowgate workflow API.
//!
//! This module contains the core data structures:
//! - Api: caller-facing requests and responses
//! - Workflow: engine-facing requests, results and runtime status

pub mod api;
pub mod workflow;

// Re-export commonly used types
pub use api::{
    Empty, GetWorkflowRequest, GetWorkflowResponse, PauseWorkflowRequest, PurgeWorkflowRequest,
    RaiseEventWorkflowRequest, ResumeWorkflowRequest, StartWorkflowRequest, StartWorkflowResponse,
    TerminateWorkflowRequest,
};
pub use workflow::{
    GetRequest, PauseRequest, PurgeRequest, RaiseEventRequest, ResumeRequest, RuntimeStatus,
    StartRequest, StartResponse, StateResponse, TerminateRequest, WorkflowState,
};
