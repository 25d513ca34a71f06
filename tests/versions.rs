//! API Vintage Integration Tests
//!
//! Tests that alpha1 and beta1 produce identical results and errors for
//! every operation.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use flowgate::adapters::MemoryEngine;
use flowgate::core::{AlwaysReady, ApiError, ComponentRegistry, WorkflowApi};
use flowgate::domain::{
    GetWorkflowRequest, PauseWorkflowRequest, PurgeWorkflowRequest, RaiseEventWorkflowRequest,
    ResumeWorkflowRequest, StartWorkflowRequest, TerminateWorkflowRequest,
};

fn fresh_api() -> WorkflowApi {
    let registry = ComponentRegistry::new().with_component("redis", Arc::new(MemoryEngine::new()));
    WorkflowApi::new(Arc::new(registry), Arc::new(AlwaysReady))
}

/// Comparable view of an outcome: the payload or the error code and message
fn outcome<T: std::fmt::Debug>(result: Result<T, ApiError>) -> Result<String, (String, String)> {
    result
        .map(|value| format!("{:?}", value))
        .map_err(|e| (e.code().to_string(), e.to_string()))
}

fn start(instance_id: &str, component: &str, workflow_name: &str) -> StartWorkflowRequest {
    StartWorkflowRequest {
        instance_id: instance_id.to_string(),
        workflow_component: component.to_string(),
        workflow_name: workflow_name.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_start_and_errors_match() {
    let cancel = CancellationToken::new();
    let cases = [
        start("wf-123_A", "redis", "checkout"),
        start("", "redis", "checkout"),
        start(&"a".repeat(65), "redis", "checkout"),
        start("wf#1", "redis", "checkout"),
        start("wf-1", "redis", ""),
        start("wf-1", "", "checkout"),
        start("wf-1", "postgres", "checkout"),
    ];

    for req in &cases {
        // Separate engines so both vintages see the same starting state
        let alpha = outcome(fresh_api().start_workflow_alpha1(req, &cancel).await);
        let beta = outcome(fresh_api().start_workflow_beta1(req, &cancel).await);
        assert_eq!(alpha, beta, "{req:?}");
    }

    // Duplicate start fails the same way through both entry points
    let api = fresh_api();
    let req = start("wf-dup", "redis", "checkout");
    api.start_workflow_beta1(&req, &cancel).await.unwrap();
    let alpha = outcome(api.start_workflow_alpha1(&req, &cancel).await);
    let beta = outcome(api.start_workflow_beta1(&req, &cancel).await);
    assert_eq!(alpha, beta);
    assert_eq!(alpha.unwrap_err().0, "ERR_START_WORKFLOW");
}

#[tokio::test]
async fn test_get_matches() {
    let cancel = CancellationToken::new();
    let api = fresh_api();
    api.start_workflow_beta1(&start("wf-1", "redis", "checkout"), &cancel)
        .await
        .unwrap();

    for instance_id in ["wf-1", "ghost", ""] {
        let req = GetWorkflowRequest {
            instance_id: instance_id.to_string(),
            workflow_component: "redis".to_string(),
        };
        let alpha = api.get_workflow_alpha1(&req, &cancel).await;
        let beta = api.get_workflow_beta1(&req, &cancel).await;
        match (alpha, beta) {
            (Ok(a), Ok(b)) => assert_eq!(a, b),
            (Err(a), Err(b)) => {
                assert_eq!(a.code(), b.code());
                assert_eq!(a.to_string(), b.to_string());
            }
            (a, b) => panic!("vintages disagree for {instance_id:?}: {a:?} vs {b:?}"),
        }
    }
}

#[tokio::test]
async fn test_lifecycle_operations_match() {
    let cancel = CancellationToken::new();

    for instance_id in ["wf-1", "ghost", ""] {
        let alpha_api = fresh_api();
        let beta_api = fresh_api();
        for api in [&alpha_api, &beta_api] {
            api.start_workflow_beta1(&start("wf-1", "redis", "checkout"), &cancel)
                .await
                .unwrap();
        }

        let id = instance_id.to_string();
        let component = "redis".to_string();

        let event = RaiseEventWorkflowRequest {
            instance_id: id.clone(),
            workflow_component: component.clone(),
            event_name: "approved".to_string(),
            event_data: b"{}".to_vec(),
        };
        assert_eq!(
            outcome(alpha_api.raise_event_workflow_alpha1(&event, &cancel).await),
            outcome(beta_api.raise_event_workflow_beta1(&event, &cancel).await),
        );

        let pause = PauseWorkflowRequest {
            instance_id: id.clone(),
            workflow_component: component.clone(),
        };
        assert_eq!(
            outcome(alpha_api.pause_workflow_alpha1(&pause, &cancel).await),
            outcome(beta_api.pause_workflow_beta1(&pause, &cancel).await),
        );

        let resume = ResumeWorkflowRequest {
            instance_id: id.clone(),
            workflow_component: component.clone(),
        };
        assert_eq!(
            outcome(alpha_api.resume_workflow_alpha1(&resume, &cancel).await),
            outcome(beta_api.resume_workflow_beta1(&resume, &cancel).await),
        );

        // Purge before terminate fails for a running instance
        let purge = PurgeWorkflowRequest {
            instance_id: id.clone(),
            workflow_component: component.clone(),
        };
        assert_eq!(
            outcome(alpha_api.purge_workflow_alpha1(&purge, &cancel).await),
            outcome(beta_api.purge_workflow_beta1(&purge, &cancel).await),
        );

        let terminate = TerminateWorkflowRequest {
            instance_id: id.clone(),
            workflow_component: component.clone(),
        };
        assert_eq!(
            outcome(alpha_api.terminate_workflow_alpha1(&terminate, &cancel).await),
            outcome(beta_api.terminate_workflow_beta1(&terminate, &cancel).await),
        );

        assert_eq!(
            outcome(alpha_api.purge_workflow_alpha1(&purge, &cancel).await),
            outcome(beta_api.purge_workflow_beta1(&purge, &cancel).await),
        );
    }
}

#[tokio::test]
async fn test_not_found_codes_through_alpha1() {
    let api = fresh_api();
    let cancel = CancellationToken::new();

    let err = api
        .terminate_workflow_alpha1(
            &TerminateWorkflowRequest {
                instance_id: "ghost".to_string(),
                workflow_component: "redis".to_string(),
            },
            &cancel,
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "ERR_INSTANCE_ID_NOT_FOUND");

    let err = api
        .resume_workflow_alpha1(
            &ResumeWorkflowRequest {
                instance_id: "ghost".to_string(),
                workflow_component: "redis".to_string(),
            },
            &cancel,
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "ERR_RESUME_WORKFLOW");
}
