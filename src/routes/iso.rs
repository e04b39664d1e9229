//! ISO Compliance Routes
//!
//! Gap analysis, progress tracking and organization-wide reporting.

use crate::error::ApiResult;
use crate::governance::iso_compliance::{
    ComplianceMaturity, GapAnalysis, IsoReport, IsoStandard, ProgressSubmission,
};
use crate::models::SuccessResponse;
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GapAnalysisRequest {
    pub standard: IsoStandard,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub maturity_level: ComplianceMaturity,
}

/// POST /api/iso/gap-analysis/{system_id}
pub async fn conduct_gap_analysis(
    State(state): State<SharedState>,
    Path(system_id): Path<String>,
    Json(request): Json<GapAnalysisRequest>,
) -> ApiResult<Json<GapAnalysis>> {
    let analysis = state
        .governance
        .conduct_gap_analysis(&system_id, request.standard)
        .await?;
    Ok(Json(analysis))
}

/// POST /api/iso/progress/{system_id}
pub async fn track_progress(
    State(state): State<SharedState>,
    Path(system_id): Path<String>,
    Json(progress): Json<ProgressSubmission>,
) -> ApiResult<Json<SuccessResponse<ProgressResponse>>> {
    let maturity_level = state
        .governance
        .track_compliance_progress(&system_id, progress)
        .await?;
    Ok(Json(SuccessResponse::with_data(
        "Compliance progress recorded",
        ProgressResponse { maturity_level },
    )))
}

/// GET /api/iso/report
pub async fn get_iso_report(State(state): State<SharedState>) -> ApiResult<Json<IsoReport>> {
    Ok(Json(state.governance.generate_iso_report().await))
}
