//! Caller-facing error taxonomy.
//!
//! Local validation failures and engine failures are both reported as an
//! [`ApiError`]. Each kind has a stable code and a transport-neutral status
//! so a server can map it onto its own wire format.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::adapters::EngineError;

use super::operation::Operation;

/// Transport-neutral status class of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCode {
    InvalidArgument,
    NotFound,
    Internal,
    Cancelled,
    Unavailable,
}

/// Errors returned by the workflow API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("no instance id provided")]
    MissingInstanceId,

    #[error("workflow instance id exceeds the max length of {limit} characters")]
    InstanceIdTooLong { limit: usize },

    #[error("workflow instance id '{instance_id}' is invalid: only letters, digits, dashes and underscores are allowed")]
    InvalidInstanceId { instance_id: String },

    #[error("workflow name is not configured")]
    MissingWorkflowName,

    #[error("missing workflow event name")]
    MissingEventName,

    #[error("no workflow component provided")]
    MissingComponentName,

    #[error("workflow component '{name}' does not exist")]
    UnknownComponent { name: String },

    #[error("unable to find workflow with the provided instance id '{instance_id}': {source}")]
    InstanceNotFound {
        instance_id: String,
        source: EngineError,
    },

    /// `context` is the workflow name for start and the instance id otherwise
    #[error("error {} workflow '{}': {}", .operation.verb(), .context, .source)]
    OperationFailed {
        operation: Operation,
        instance_id: String,
        context: String,
        source: EngineError,
    },

    #[error("request cancelled while waiting for the workflow engine")]
    Cancelled,

    /// The host dropped its readiness handle without ever signalling ready
    #[error("workflow engine shut down before becoming ready")]
    EngineUnavailable,
}

impl ApiError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingInstanceId => "ERR_INSTANCE_ID_PROVIDED_MISSING",
            Self::InstanceIdTooLong { .. } => "ERR_INSTANCE_ID_TOO_LONG",
            Self::InvalidInstanceId { .. } => "ERR_INSTANCE_ID_INVALID",
            Self::MissingWorkflowName => "ERR_WORKFLOW_NAME_MISSING",
            Self::MissingEventName => "ERR_WORKFLOW_EVENT_NAME_MISSING",
            Self::MissingComponentName => "ERR_WORKFLOW_COMPONENT_MISSING",
            Self::UnknownComponent { .. } => "ERR_WORKFLOW_COMPONENT_NOT_FOUND",
            Self::InstanceNotFound { .. } => "ERR_INSTANCE_ID_NOT_FOUND",
            Self::OperationFailed { operation, .. } => operation.failure_code(),
            Self::Cancelled => "ERR_REQUEST_CANCELLED",
            Self::EngineUnavailable => "ERR_WORKFLOW_ENGINE_UNAVAILABLE",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingInstanceId
            | Self::InstanceIdTooLong { .. }
            | Self::InvalidInstanceId { .. }
            | Self::MissingWorkflowName
            | Self::MissingEventName
            | Self::MissingComponentName
            | Self::UnknownComponent { .. } => StatusCode::InvalidArgument,
            Self::InstanceNotFound { .. } => StatusCode::NotFound,
            Self::OperationFailed { .. } => StatusCode::Internal,
            Self::Cancelled => StatusCode::Cancelled,
            Self::EngineUnavailable => StatusCode::Unavailable,
        }
    }
}

/// Map an engine failure onto the caller-facing taxonomy.
///
/// The not-found sentinel becomes `InstanceNotFound` only for operations
/// that report it; everything else is an `OperationFailed` carrying the
/// engine error as its source.
pub fn normalize_engine_error(
    error: EngineError,
    operation: Operation,
    instance_id: &str,
    context: &str,
) -> ApiError {
    if operation.is_not_found_capable() && error.is_not_found() {
        return ApiError::InstanceNotFound {
            instance_id: instance_id.to_string(),
            source: error,
        };
    }

    ApiError::OperationFailed {
        operation,
        instance_id: instance_id.to_string(),
        context: context.to_string(),
        source: error,
    }
}
