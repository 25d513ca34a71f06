//! Workflow API dispatcher.
//!
//! Every operation follows the same path: validate the request, wait for
//! the readiness gate, resolve the named component, call it, and translate
//! the result or normalize the error. Nothing is retried and no engine call
//! happens after a validation or resolution failure.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

use crate::adapters::WorkflowComponent;
use crate::domain::{
    Empty, GetRequest, GetWorkflowRequest, GetWorkflowResponse, PauseRequest,
    PauseWorkflowRequest, PurgeRequest, PurgeWorkflowRequest, RaiseEventRequest,
    RaiseEventWorkflowRequest, ResumeRequest, ResumeWorkflowRequest, StartRequest,
    StartWorkflowRequest, StartWorkflowResponse, TerminateRequest, TerminateWorkflowRequest,
};

use super::error::{normalize_engine_error, ApiError};
use super::operation::Operation;
use super::readiness::ReadinessGate;
use super::registry::{resolve_component, ComponentRegistry};
use super::validation::validate_instance_id;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Entry point for workflow lifecycle calls.
///
/// Holds no per-call state; clones share the same registry and gate.
#[derive(Clone)]
pub struct WorkflowApi {
    registry: Arc<ComponentRegistry>,
    readiness: Arc<dyn ReadinessGate>,
}

impl WorkflowApi {
    pub fn new(registry: Arc<ComponentRegistry>, readiness: Arc<dyn ReadinessGate>) -> Self {
        Self {
            registry,
            readiness,
        }
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Shared prelude: readiness, then component lookup
    async fn component(
        &self,
        name: &str,
        cancel: &CancellationToken,
    ) -> ApiResult<Arc<dyn WorkflowComponent>> {
        self.readiness.wait_ready(cancel).await?;
        resolve_component(&self.registry, name)
    }

    #[instrument(skip_all, fields(instance_id = %req.instance_id, component = %req.workflow_component))]
    pub async fn get_workflow_beta1(
        &self,
        req: &GetWorkflowRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<GetWorkflowResponse> {
        log_outcome(Operation::Get, self.get_workflow(req, cancel).await)
    }

    #[instrument(skip_all, fields(instance_id = %req.instance_id, component = %req.workflow_component, workflow = %req.workflow_name))]
    pub async fn start_workflow_beta1(
        &self,
        req: &StartWorkflowRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<StartWorkflowResponse> {
        log_outcome(Operation::Start, self.start_workflow(req, cancel).await)
    }

    #[instrument(skip_all, fields(instance_id = %req.instance_id, component = %req.workflow_component))]
    pub async fn terminate_workflow_beta1(
        &self,
        req: &TerminateWorkflowRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<Empty> {
        log_outcome(Operation::Terminate, self.terminate_workflow(req, cancel).await)
    }

    #[instrument(skip_all, fields(instance_id = %req.instance_id, component = %req.workflow_component, event = %req.event_name))]
    pub async fn raise_event_workflow_beta1(
        &self,
        req: &RaiseEventWorkflowRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<Empty> {
        log_outcome(Operation::RaiseEvent, self.raise_event_workflow(req, cancel).await)
    }

    #[instrument(skip_all, fields(instance_id = %req.instance_id, component = %req.workflow_component))]
    pub async fn pause_workflow_beta1(
        &self,
        req: &PauseWorkflowRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<Empty> {
        log_outcome(Operation::Pause, self.pause_workflow(req, cancel).await)
    }

    #[instrument(skip_all, fields(instance_id = %req.instance_id, component = %req.workflow_component))]
    pub async fn resume_workflow_beta1(
        &self,
        req: &ResumeWorkflowRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<Empty> {
        log_outcome(Operation::Resume, self.resume_workflow(req, cancel).await)
    }

    #[instrument(skip_all, fields(instance_id = %req.instance_id, component = %req.workflow_component))]
    pub async fn purge_workflow_beta1(
        &self,
        req: &PurgeWorkflowRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<Empty> {
        log_outcome(Operation::Purge, self.purge_workflow(req, cancel).await)
    }

    async fn get_workflow(
        &self,
        req: &GetWorkflowRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<GetWorkflowResponse> {
        validate_instance_id(&req.instance_id, Operation::Get.is_create())?;
        let component = self.component(&req.workflow_component, cancel).await?;

        let engine_req = GetRequest {
            instance_id: req.instance_id.clone(),
        };
        let response = component.get(&engine_req, cancel).await.map_err(|e| {
            normalize_engine_error(e, Operation::Get, &req.instance_id, &req.instance_id)
        })?;

        Ok(GetWorkflowResponse::from(response.workflow))
    }

    async fn start_workflow(
        &self,
        req: &StartWorkflowRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<StartWorkflowResponse> {
        validate_instance_id(&req.instance_id, Operation::Start.is_create())?;
        if req.workflow_name.is_empty() {
            return Err(ApiError::MissingWorkflowName);
        }
        let component = self.component(&req.workflow_component, cancel).await?;

        let engine_req = StartRequest {
            instance_id: req.instance_id.clone(),
            workflow_name: req.workflow_name.clone(),
            options: req.options.clone(),
            workflow_input: req.input.clone(),
        };
        let response = component.start(&engine_req, cancel).await.map_err(|e| {
            normalize_engine_error(e, Operation::Start, &req.instance_id, &req.workflow_name)
        })?;

        Ok(StartWorkflowResponse {
            instance_id: response.instance_id,
        })
    }

    async fn terminate_workflow(
        &self,
        req: &TerminateWorkflowRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<Empty> {
        validate_instance_id(&req.instance_id, Operation::Terminate.is_create())?;
        let component = self.component(&req.workflow_component, cancel).await?;

        let engine_req = TerminateRequest {
            instance_id: req.instance_id.clone(),
        };
        component.terminate(&engine_req, cancel).await.map_err(|e| {
            normalize_engine_error(e, Operation::Terminate, &req.instance_id, &req.instance_id)
        })?;

        Ok(Empty::default())
    }

    async fn raise_event_workflow(
        &self,
        req: &RaiseEventWorkflowRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<Empty> {
        validate_instance_id(&req.instance_id, Operation::RaiseEvent.is_create())?;
        if req.event_name.is_empty() {
            return Err(ApiError::MissingEventName);
        }
        let component = self.component(&req.workflow_component, cancel).await?;

        let engine_req = RaiseEventRequest {
            instance_id: req.instance_id.clone(),
            event_name: req.event_name.clone(),
            event_data: req.event_data.clone(),
        };
        component.raise_event(&engine_req, cancel).await.map_err(|e| {
            normalize_engine_error(e, Operation::RaiseEvent, &req.instance_id, &req.instance_id)
        })?;

        Ok(Empty::default())
    }

    async fn pause_workflow(
        &self,
        req: &PauseWorkflowRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<Empty> {
        validate_instance_id(&req.instance_id, Operation::Pause.is_create())?;
        let component = self.component(&req.workflow_component, cancel).await?;

        let engine_req = PauseRequest {
            instance_id: req.instance_id.clone(),
        };
        component.pause(&engine_req, cancel).await.map_err(|e| {
            normalize_engine_error(e, Operation::Pause, &req.instance_id, &req.instance_id)
        })?;

        Ok(Empty::default())
    }

    async fn resume_workflow(
        &self,
        req: &ResumeWorkflowRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<Empty> {
        validate_instance_id(&req.instance_id, Operation::Resume.is_create())?;
        let component = self.component(&req.workflow_component, cancel).await?;

        let engine_req = ResumeRequest {
            instance_id: req.instance_id.clone(),
        };
        component.resume(&engine_req, cancel).await.map_err(|e| {
            normalize_engine_error(e, Operation::Resume, &req.instance_id, &req.instance_id)
        })?;

        Ok(Empty::default())
    }

    async fn purge_workflow(
        &self,
        req: &PurgeWorkflowRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<Empty> {
        validate_instance_id(&req.instance_id, Operation::Purge.is_create())?;
        let component = self.component(&req.workflow_component, cancel).await?;

        let engine_req = PurgeRequest {
            instance_id: req.instance_id.clone(),
        };
        component.purge(&engine_req, cancel).await.map_err(|e| {
            normalize_engine_error(e, Operation::Purge, &req.instance_id, &req.instance_id)
        })?;

        Ok(Empty::default())
    }
}

fn log_outcome<T>(operation: Operation, result: ApiResult<T>) -> ApiResult<T> {
    match &result {
        Ok(_) => debug!(%operation, "Workflow call succeeded"),
        Err(e) => debug!(%operation, code = e.code(), error = %e, "Workflow call failed"),
    }
    result
}
