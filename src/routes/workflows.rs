//! Workflow Routes
//!
//! Thin JSON passthroughs to the workflow orchestrator.

use crate::error::ApiResult;
use crate::models::{MessageResponse, SuccessResponse};
use crate::state::SharedState;
use crate::workflow::orchestrator::InitiationResult;
use crate::workflow::types::{
    ApprovalDecision, ApprovalRecord, StepOutcome, WorkflowInstance, WorkflowListing,
    WorkflowStatus, WorkflowStatusView, WorkflowTemplate, WorkflowType,
};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

// =============================================================================
// REQUEST/RESPONSE TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateWorkflowRequest {
    pub template_id: String,
    pub system_id: String,
    #[serde(default)]
    pub additional_context: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteStepRequest {
    #[serde(default)]
    pub step_data: Option<HashMap<String, Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequest {
    pub step_index: usize,
    pub approver: String,
    pub decision: ApprovalDecision,
    #[serde(default)]
    pub comments: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequest {
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct WorkflowListQuery {
    pub status: Option<WorkflowStatus>,
    pub workflow_type: Option<WorkflowType>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateListResponse {
    pub templates: Vec<WorkflowTemplate>,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// POST /api/workflows/initiate
pub async fn initiate_workflow(
    State(state): State<SharedState>,
    Json(request): Json<InitiateWorkflowRequest>,
) -> ApiResult<Json<SuccessResponse<InitiationResult>>> {
    let mut context = request.additional_context;
    context.insert(
        "system_id".to_string(),
        Value::String(request.system_id),
    );

    let result = state
        .workflows
        .initiate_workflow(&request.template_id, context)
        .await?;
    Ok(Json(SuccessResponse::with_data("Workflow initiated", result)))
}

/// GET /api/workflows
pub async fn list_workflows(
    State(state): State<SharedState>,
    Query(query): Query<WorkflowListQuery>,
) -> ApiResult<Json<WorkflowListing>> {
    let listing = state
        .workflows
        .list_workflows(query.status, query.workflow_type)
        .await;
    Ok(Json(listing))
}

/// GET /api/workflows/templates
pub async fn list_templates(
    State(state): State<SharedState>,
) -> ApiResult<Json<TemplateListResponse>> {
    Ok(Json(TemplateListResponse {
        templates: state.workflows.list_templates().await,
    }))
}

/// POST /api/workflows/templates
pub async fn register_template(
    State(state): State<SharedState>,
    Json(template): Json<WorkflowTemplate>,
) -> ApiResult<Json<MessageResponse>> {
    let template_id = template.template_id.clone();
    state.workflows.register_template(template).await?;
    Ok(Json(MessageResponse {
        message: format!("Template {} registered", template_id),
    }))
}

/// GET /api/workflows/{workflow_id}
pub async fn get_workflow(
    State(state): State<SharedState>,
    Path(workflow_id): Path<Uuid>,
) -> ApiResult<Json<WorkflowInstance>> {
    let instance = state.workflows.get_workflow(workflow_id).await?;
    Ok(Json(instance))
}

/// GET /api/workflows/{workflow_id}/status
pub async fn get_workflow_status(
    State(state): State<SharedState>,
    Path(workflow_id): Path<Uuid>,
) -> ApiResult<Json<WorkflowStatusView>> {
    let view = state.workflows.get_workflow_status(workflow_id).await?;
    Ok(Json(view))
}

/// POST /api/workflows/{workflow_id}/start
pub async fn start_workflow(
    State(state): State<SharedState>,
    Path(workflow_id): Path<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    let status = state.workflows.start_workflow(workflow_id).await?;
    Ok(Json(MessageResponse {
        message: format!("Workflow started, status: {}", status.as_str()),
    }))
}

/// POST /api/workflows/{workflow_id}/execute
pub async fn execute_workflow_step(
    State(state): State<SharedState>,
    Path(workflow_id): Path<Uuid>,
    request: Result<Json<ExecuteStepRequest>, JsonRejection>,
) -> ApiResult<Json<StepOutcome>> {
    // The body is optional; a missing or empty body means no step data
    let step_data = request.ok().and_then(|Json(r)| r.step_data);
    let outcome = state
        .workflows
        .execute_workflow_step(workflow_id, step_data)
        .await?;
    Ok(Json(outcome))
}

/// POST /api/workflows/{workflow_id}/approve
pub async fn approve_workflow_step(
    State(state): State<SharedState>,
    Path(workflow_id): Path<Uuid>,
    Json(request): Json<ApprovalRequest>,
) -> ApiResult<Json<SuccessResponse<ApprovalRecord>>> {
    let record = state
        .workflows
        .approve_workflow_step(
            workflow_id,
            request.step_index,
            &request.approver,
            request.decision,
            request.comments,
        )
        .await?;
    Ok(Json(SuccessResponse::with_data("Decision recorded", record)))
}

/// POST /api/workflows/{workflow_id}/cancel
pub async fn cancel_workflow(
    State(state): State<SharedState>,
    Path(workflow_id): Path<Uuid>,
    request: Result<Json<CancelRequest>, JsonRejection>,
) -> ApiResult<Json<MessageResponse>> {
    // The body is optional; a missing body means no cancellation reason
    let reason = request.ok().map(|Json(r)| r.reason).unwrap_or_default();
    state
        .workflows
        .cancel_workflow(workflow_id, reason)
        .await?;
    Ok(Json(MessageResponse {
        message: format!("Workflow {} cancelled", workflow_id),
    }))
}
