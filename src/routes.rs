//! Route definitions and router setup
//!
//! Configures all API routes and middleware.

mod data;
mod iso;
mod model_risk;
mod oversight;
mod systems;
mod workflows;

use crate::config::Settings;
use crate::state::SharedState;
use axum::{
    http::{header, Method},
    routing::{get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::Level;

/// Create the application router with all routes and middleware
pub fn create_router(state: SharedState, settings: &Settings) -> Router {
    // Build CORS layer
    let cors = build_cors_layer(settings);

    // Build tracing/logging layer
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Build middleware stack
    let middleware = ServiceBuilder::new()
        .set_x_request_id(MakeRequestUuid)
        .layer(trace_layer)
        .layer(CompressionLayer::new())
        .layer(cors)
        .propagate_x_request_id();

    // Build the router
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // System management
        .route("/api/systems/register", post(systems::register_system))
        .route("/api/systems", get(systems::list_systems))
        .route("/api/systems/{system_id}", get(systems::get_system))

        // Compliance
        .route("/api/compliance/assess/{system_id}", post(systems::assess_compliance))
        .route("/api/compliance/dashboard", get(systems::get_dashboard))

        // Workflows
        .route("/api/workflows/initiate", post(workflows::initiate_workflow))
        .route("/api/workflows", get(workflows::list_workflows))
        .route(
            "/api/workflows/templates",
            get(workflows::list_templates).post(workflows::register_template),
        )
        .route("/api/workflows/{workflow_id}", get(workflows::get_workflow))
        .route("/api/workflows/{workflow_id}/status", get(workflows::get_workflow_status))
        .route("/api/workflows/{workflow_id}/start", post(workflows::start_workflow))
        .route("/api/workflows/{workflow_id}/execute", post(workflows::execute_workflow_step))
        .route("/api/workflows/{workflow_id}/approve", post(workflows::approve_workflow_step))
        .route("/api/workflows/{workflow_id}/cancel", post(workflows::cancel_workflow))

        // Model risk
        .route("/api/model-risk/validate/{system_id}", post(model_risk::validate_model))
        .route("/api/model-risk/report/{system_id}", get(model_risk::get_model_report))
        .route("/api/model-risk/metrics/{system_id}", post(model_risk::log_metrics))

        // Oversight
        .route("/api/oversight/decisions/{system_id}", post(oversight::log_decision))
        .route("/api/oversight/audit-trail/{system_id}", get(oversight::get_audit_trail))
        .route("/api/oversight/transparency/{system_id}", get(oversight::get_transparency_report))

        // Data governance & residency
        .route("/api/data-governance/quality/{system_id}", post(data::assess_quality))
        .route("/api/data-governance/lineage/{system_id}", post(data::track_lineage))
        .route("/api/data-governance/privacy/{system_id}", post(data::check_privacy))
        .route("/api/data-governance/inventory", get(data::get_inventory))
        .route("/api/residency/locations/{system_id}", post(data::track_location))
        .route("/api/residency/policies", put(data::update_policy))
        .route("/api/residency/transfers/validate", post(data::validate_transfer))
        .route("/api/residency/report", get(data::get_residency_report))

        // ISO compliance
        .route("/api/iso/gap-analysis/{system_id}", post(iso::conduct_gap_analysis))
        .route("/api/iso/progress/{system_id}", post(iso::track_progress))
        .route("/api/iso/report", get(iso::get_iso_report))

        // Apply middleware and state
        .layer(middleware)
        .with_state(state)
}

/// Build CORS layer from settings
fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<_> = settings
        .cors
        .allowed_origins
        .iter()
        .filter_map(|s| s.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .max_age(Duration::from_secs(3600))
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .max_age(Duration::from_secs(3600))
    }
}

/// Health check endpoint
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "success": true,
        "message": "Server is running fine.",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
