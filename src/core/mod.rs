//! Core API logic.
//!
//! This module contains:
//! - Validation: instance id rules
//! - Registry: named component lookup
//! - Readiness: gate awaited before engine calls
//! - Error: caller-facing taxonomy and engine error normalization
//! - Api: the dispatcher behind both API vintages

pub mod alpha;
pub mod api;
pub mod error;
pub mod operation;
pub mod readiness;
pub mod registry;
pub mod validation;

// Re-export commonly used types
pub use alpha::ApiVersion;
pub use api::{ApiResult, WorkflowApi};
pub use error::{normalize_engine_error, ApiError, StatusCode};
pub use operation::Operation;
pub use readiness::{AlwaysReady, ReadinessGate, ReadyHandle, ReadySignal};
pub use registry::{resolve_component, ComponentRegistry};
pub use validation::{validate_instance_id, MAX_INSTANCE_ID_LENGTH};
