//! File Engine Integration Tests
//!
//! Tests for persisted workflow state across engine instances, driven
//! through the workflow API.

use std::sync::Arc;

use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};
use tokio_util::sync::CancellationToken;

use flowgate::adapters::FileEngine;
use flowgate::core::{AlwaysReady, ApiError, ComponentRegistry, WorkflowApi};
use flowgate::domain::{
    GetWorkflowRequest, PauseWorkflowRequest, PurgeWorkflowRequest, RaiseEventWorkflowRequest,
    ResumeWorkflowRequest, StartWorkflowRequest, TerminateWorkflowRequest,
};

async fn open_api(temp: &TempDir) -> WorkflowApi {
    let engine = FileEngine::open(temp.path().join("state")).await.unwrap();
    let registry = ComponentRegistry::new().with_component("local", Arc::new(engine));
    WorkflowApi::new(Arc::new(registry), Arc::new(AlwaysReady))
}

fn get(instance_id: &str) -> GetWorkflowRequest {
    GetWorkflowRequest {
        instance_id: instance_id.to_string(),
        workflow_component: "local".to_string(),
    }
}

#[tokio::test]
async fn test_state_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let cancel = CancellationToken::new();

    {
        let api = open_api(&temp).await;
        let mut req = StartWorkflowRequest {
            instance_id: "order-1".to_string(),
            workflow_component: "local".to_string(),
            workflow_name: "checkout".to_string(),
            input: b"{\"amount\":12}".to_vec(),
            ..Default::default()
        };
        req.options.insert("priority".to_string(), "high".to_string());
        assert_ok!(api.start_workflow_beta1(&req, &cancel).await);

        let event = RaiseEventWorkflowRequest {
            instance_id: "order-1".to_string(),
            workflow_component: "local".to_string(),
            event_name: "approved".to_string(),
            event_data: Vec::new(),
        };
        assert_ok!(api.raise_event_workflow_beta1(&event, &cancel).await);

        let pause = PauseWorkflowRequest {
            instance_id: "order-1".to_string(),
            workflow_component: "local".to_string(),
        };
        assert_ok!(api.pause_workflow_beta1(&pause, &cancel).await);
    }

    // A new engine over the same directory sees the same instance
    let api = open_api(&temp).await;
    let state = api.get_workflow_beta1(&get("order-1"), &cancel).await.unwrap();
    assert_eq!(state.workflow_name, "checkout");
    assert_eq!(state.runtime_status, "SUSPENDED");
    assert_eq!(
        state.properties.get("workflow.input").map(String::as_str),
        Some("{\"amount\":12}")
    );
    assert_eq!(
        state.properties.get("option.priority").map(String::as_str),
        Some("high")
    );
    assert_eq!(
        state.properties.get("workflow.last_event").map(String::as_str),
        Some("approved")
    );
    assert!(state.last_updated_at >= state.created_at);

    let resume = ResumeWorkflowRequest {
        instance_id: "order-1".to_string(),
        workflow_component: "local".to_string(),
    };
    assert_ok!(api.resume_workflow_alpha1(&resume, &cancel).await);
    let state = api.get_workflow_beta1(&get("order-1"), &cancel).await.unwrap();
    assert_eq!(state.runtime_status, "RUNNING");
}

#[tokio::test]
async fn test_terminate_then_purge_removes_state() {
    let temp = TempDir::new().unwrap();
    let cancel = CancellationToken::new();
    let api = open_api(&temp).await;

    let req = StartWorkflowRequest {
        instance_id: "order-2".to_string(),
        workflow_component: "local".to_string(),
        workflow_name: "checkout".to_string(),
        ..Default::default()
    };
    assert_ok!(api.start_workflow_beta1(&req, &cancel).await);

    let purge = PurgeWorkflowRequest {
        instance_id: "order-2".to_string(),
        workflow_component: "local".to_string(),
    };
    let err = api.purge_workflow_beta1(&purge, &cancel).await.unwrap_err();
    assert_eq!(err.code(), "ERR_PURGE_WORKFLOW");

    let terminate = TerminateWorkflowRequest {
        instance_id: "order-2".to_string(),
        workflow_component: "local".to_string(),
    };
    assert_ok!(api.terminate_workflow_beta1(&terminate, &cancel).await);
    // Terminating twice is harmless
    assert_ok!(api.terminate_workflow_beta1(&terminate, &cancel).await);
    assert_ok!(api.purge_workflow_beta1(&purge, &cancel).await);

    let err = api.get_workflow_beta1(&get("order-2"), &cancel).await.unwrap_err();
    assert!(matches!(err, ApiError::InstanceNotFound { .. }));

    assert_err!(api.purge_workflow_beta1(&purge, &cancel).await);

    let leftovers = std::fs::read_dir(temp.path().join("state")).unwrap().count();
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn test_lenient_ids_on_lookup() {
    let temp = TempDir::new().unwrap();
    let cancel = CancellationToken::new();
    let api = open_api(&temp).await;

    // Ids that could never be created still get a clean not-found
    let oversized = "x".repeat(500);
    for id in ["../../etc/passwd", "wf#1", oversized.as_str()] {
        let err = api.get_workflow_beta1(&get(id), &cancel).await.unwrap_err();
        assert_eq!(err.code(), "ERR_INSTANCE_ID_NOT_FOUND", "{id:?}");
    }
}
