//! Oversight Routes
//!
//! Decision logging, audit trail and transparency reporting endpoints.

use crate::error::ApiResult;
use crate::governance::oversight::{AuditTrail, DecisionSubmission, TransparencyReport};
use crate::models::SuccessResponse;
use crate::state::SharedState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct AuditTrailQuery {
    pub event_type: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    100
}

#[derive(Debug, Deserialize)]
pub struct TransparencyQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResponse {
    pub decision_id: Uuid,
}

/// POST /api/oversight/decisions/{system_id}
pub async fn log_decision(
    State(state): State<SharedState>,
    Path(system_id): Path<String>,
    Json(submission): Json<DecisionSubmission>,
) -> ApiResult<Json<SuccessResponse<DecisionResponse>>> {
    let decision_id = state.governance.log_decision(&system_id, submission).await?;
    Ok(Json(SuccessResponse::with_data(
        "Decision logged",
        DecisionResponse { decision_id },
    )))
}

/// GET /api/oversight/audit-trail/{system_id}
pub async fn get_audit_trail(
    State(state): State<SharedState>,
    Path(system_id): Path<String>,
    Query(query): Query<AuditTrailQuery>,
) -> ApiResult<Json<AuditTrail>> {
    let trail = state
        .governance
        .get_audit_trail(&system_id, query.event_type.as_deref(), query.limit)
        .await?;
    Ok(Json(trail))
}

/// GET /api/oversight/transparency/{system_id}
pub async fn get_transparency_report(
    State(state): State<SharedState>,
    Path(system_id): Path<String>,
    Query(query): Query<TransparencyQuery>,
) -> ApiResult<Json<TransparencyReport>> {
    let report = state
        .governance
        .generate_transparency_report(&system_id, query.start_date, query.end_date)
        .await?;
    Ok(Json(report))
}
