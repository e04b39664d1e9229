//! System Routes
//!
//! Registration, listing and compliance assessment endpoints.

use crate::error::{validation_error, ApiResult};
use crate::governance::framework::{
    ComplianceStatus, GovernanceDashboard, GovernanceRecord, RegistrationResult,
};
use crate::governance::types::SystemProfile;
use crate::models::SuccessResponse;
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use validator::Validate;

// =============================================================================
// REQUEST/RESPONSE TYPES
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemListResponse {
    pub systems: Vec<GovernanceRecord>,
    pub total_count: usize,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// POST /api/systems/register
pub async fn register_system(
    State(state): State<SharedState>,
    Json(profile): Json<SystemProfile>,
) -> ApiResult<Json<SuccessResponse<RegistrationResult>>> {
    profile
        .validate()
        .map_err(|e| validation_error(e.to_string()))?;

    let result = state.governance.register_ai_system(profile).await;
    Ok(Json(SuccessResponse::with_data(
        "System registered for governance",
        result,
    )))
}

/// GET /api/systems
pub async fn list_systems(
    State(state): State<SharedState>,
) -> ApiResult<Json<SystemListResponse>> {
    let systems = state.governance.list_systems().await;
    Ok(Json(SystemListResponse {
        total_count: systems.len(),
        systems,
    }))
}

/// GET /api/systems/{system_id}
pub async fn get_system(
    State(state): State<SharedState>,
    Path(system_id): Path<String>,
) -> ApiResult<Json<GovernanceRecord>> {
    let record = state.governance.get_system(&system_id).await?;
    Ok(Json(record))
}

/// POST /api/compliance/assess/{system_id}
pub async fn assess_compliance(
    State(state): State<SharedState>,
    Path(system_id): Path<String>,
) -> ApiResult<Json<ComplianceStatus>> {
    let status = state.governance.assess_system_compliance(&system_id).await?;
    Ok(Json(status))
}

/// GET /api/compliance/dashboard
pub async fn get_dashboard(
    State(state): State<SharedState>,
) -> ApiResult<Json<GovernanceDashboard>> {
    Ok(Json(state.governance.get_governance_dashboard().await))
}
