//! Data Governance & Residency Routes
//!
//! Quality, lineage, privacy, location tracking and transfer validation
//! endpoints.

use crate::error::ApiResult;
use crate::governance::data_governance::{
    DataInventory, LineageSubmission, PrivacyCheck, PrivacySubmission, QualityDimensions,
    QualityReport,
};
use crate::governance::data_residency::{
    LocationSubmission, ResidencyPolicy, ResidencyReport, ResidencyViolation, TransferValidation,
};
use crate::models::{MessageResponse, SuccessResponse};
use crate::state::SharedState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// REQUEST/RESPONSE TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityRequest {
    pub data_source: String,
    pub dimensions: QualityDimensions,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub from_region: String,
    pub to_region: String,
    #[serde(default)]
    pub data_types: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeQuery {
    pub system_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub violations: Vec<ResidencyViolation>,
}

// =============================================================================
// DATA GOVERNANCE HANDLERS
// =============================================================================

/// POST /api/data-governance/quality/{system_id}
pub async fn assess_quality(
    State(state): State<SharedState>,
    Path(system_id): Path<String>,
    Json(request): Json<QualityRequest>,
) -> ApiResult<Json<QualityReport>> {
    let report = state
        .governance
        .assess_data_quality(&system_id, &request.data_source, request.dimensions)
        .await?;
    Ok(Json(report))
}

/// POST /api/data-governance/lineage/{system_id}
pub async fn track_lineage(
    State(state): State<SharedState>,
    Path(system_id): Path<String>,
    Json(submission): Json<LineageSubmission>,
) -> ApiResult<Json<MessageResponse>> {
    state
        .governance
        .track_data_lineage(&system_id, submission)
        .await?;
    Ok(Json(MessageResponse {
        message: format!("Lineage tracked for system {}", system_id),
    }))
}

/// POST /api/data-governance/privacy/{system_id}
pub async fn check_privacy(
    State(state): State<SharedState>,
    Path(system_id): Path<String>,
    Json(submission): Json<PrivacySubmission>,
) -> ApiResult<Json<PrivacyCheck>> {
    let check = state
        .governance
        .check_privacy_compliance(&system_id, submission)
        .await?;
    Ok(Json(check))
}

/// GET /api/data-governance/inventory
pub async fn get_inventory(
    State(state): State<SharedState>,
    Query(query): Query<ScopeQuery>,
) -> ApiResult<Json<DataInventory>> {
    let inventory = state
        .governance
        .generate_data_inventory(query.system_id.as_deref())
        .await?;
    Ok(Json(inventory))
}

// =============================================================================
// DATA RESIDENCY HANDLERS
// =============================================================================

/// POST /api/residency/locations/{system_id}
pub async fn track_location(
    State(state): State<SharedState>,
    Path(system_id): Path<String>,
    Json(submission): Json<LocationSubmission>,
) -> ApiResult<Json<SuccessResponse<LocationResponse>>> {
    let violations = state
        .governance
        .track_data_location(&system_id, submission)
        .await?;
    Ok(Json(SuccessResponse::with_data(
        "Data locations tracked",
        LocationResponse { violations },
    )))
}

/// PUT /api/residency/policies
pub async fn update_policy(
    State(state): State<SharedState>,
    Json(policy): Json<ResidencyPolicy>,
) -> ApiResult<Json<MessageResponse>> {
    let policy_id = state.governance.update_residency_policy(policy).await;
    Ok(Json(MessageResponse {
        message: format!("Policy {} updated", policy_id),
    }))
}

/// POST /api/residency/transfers/validate
pub async fn validate_transfer(
    State(state): State<SharedState>,
    Json(request): Json<TransferRequest>,
) -> ApiResult<Json<TransferValidation>> {
    let validation = state
        .governance
        .validate_data_transfer(&request.from_region, &request.to_region, &request.data_types)
        .await;
    Ok(Json(validation))
}

/// GET /api/residency/report
pub async fn get_residency_report(
    State(state): State<SharedState>,
    Query(query): Query<ScopeQuery>,
) -> ApiResult<Json<ResidencyReport>> {
    let report = state
        .governance
        .get_residency_report(query.system_id.as_deref())
        .await?;
    Ok(Json(report))
}
