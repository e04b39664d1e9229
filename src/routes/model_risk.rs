//! Model Risk Routes
//!
//! Model validation, monitoring and reporting endpoints.

use crate::error::ApiResult;
use crate::governance::model_risk::{
    ModelReport, PerformanceMetrics, ValidationOutcome, ValidationSubmission,
};
use crate::models::SuccessResponse;
use crate::state::SharedState;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    pub alerts: Vec<String>,
}

/// POST /api/model-risk/validate/{system_id}
pub async fn validate_model(
    State(state): State<SharedState>,
    Path(system_id): Path<String>,
    Json(submission): Json<ValidationSubmission>,
) -> ApiResult<Json<SuccessResponse<ValidationOutcome>>> {
    let outcome = state
        .governance
        .validate_model(&system_id, submission)
        .await?;
    Ok(Json(SuccessResponse::with_data(
        "Model validation recorded",
        outcome,
    )))
}

/// GET /api/model-risk/report/{system_id}
pub async fn get_model_report(
    State(state): State<SharedState>,
    Path(system_id): Path<String>,
) -> ApiResult<Json<ModelReport>> {
    let report = state.governance.get_model_report(&system_id).await?;
    Ok(Json(report))
}

/// POST /api/model-risk/metrics/{system_id}
pub async fn log_metrics(
    State(state): State<SharedState>,
    Path(system_id): Path<String>,
    Json(metrics): Json<PerformanceMetrics>,
) -> ApiResult<Json<MetricsResponse>> {
    let alerts = state
        .governance
        .log_performance_metrics(&system_id, metrics)
        .await?;
    Ok(Json(MetricsResponse { alerts }))
}
