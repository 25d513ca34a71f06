//! Alpha1 vintage of the workflow API.
//!
//! Every alpha1 entry point forwards to its beta1 counterpart unchanged.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use tokio_util::sync::CancellationToken;

use crate::domain::{
    Empty, GetWorkflowRequest, GetWorkflowResponse, PauseWorkflowRequest, PurgeWorkflowRequest,
    RaiseEventWorkflowRequest, ResumeWorkflowRequest, StartWorkflowRequest, StartWorkflowResponse,
    TerminateWorkflowRequest,
};

use super::api::{ApiResult, WorkflowApi};

/// API vintage a caller addressed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, ValueEnum)]
pub enum ApiVersion {
    Alpha1,
    #[default]
    Beta1,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alpha1 => "alpha1",
            Self::Beta1 => "beta1",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alpha1" => Ok(Self::Alpha1),
            "beta1" => Ok(Self::Beta1),
            other => Err(format!("unknown API version '{}'", other)),
        }
    }
}

impl WorkflowApi {
    pub async fn get_workflow_alpha1(
        &self,
        req: &GetWorkflowRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<GetWorkflowResponse> {
        self.get_workflow_beta1(req, cancel).await
    }

    pub async fn start_workflow_alpha1(
        &self,
        req: &StartWorkflowRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<StartWorkflowResponse> {
        self.start_workflow_beta1(req, cancel).await
    }

    pub async fn terminate_workflow_alpha1(
        &self,
        req: &TerminateWorkflowRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<Empty> {
        self.terminate_workflow_beta1(req, cancel).await
    }

    pub async fn raise_event_workflow_alpha1(
        &self,
        req: &RaiseEventWorkflowRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<Empty> {
        self.raise_event_workflow_beta1(req, cancel).await
    }

    pub async fn pause_workflow_alpha1(
        &self,
        req: &PauseWorkflowRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<Empty> {
        self.pause_workflow_beta1(req, cancel).await
    }

    pub async fn resume_workflow_alpha1(
        &self,
        req: &ResumeWorkflowRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<Empty> {
        self.resume_workflow_beta1(req, cancel).await
    }

    pub async fn purge_workflow_alpha1(
        &self,
        req: &PurgeWorkflowRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<Empty> {
        self.purge_workflow_beta1(req, cancel).await
    }
}
