//! AI Governance Platform API
//!
//! Registers AI systems for governance, scores their compliance across five
//! domains (model risk, oversight, data governance, data residency, ISO
//! standards) and orchestrates governance workflows with approval gates.
//!
//! All state is held in process memory: there is no database and nothing
//! survives a restart.

mod config;
mod error;
mod governance;
mod models;
mod routes;
mod state;
mod workflow;

use crate::config::Settings;
use crate::routes::create_router;
use crate::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing();

    info!("🚀 Starting AI Governance Platform...");

    // Load configuration
    let settings = Settings::load()?;
    info!("📋 Configuration loaded successfully");

    // Build in-memory application state
    let state = Arc::new(AppState::new(&settings));

    // Build the router
    let app = create_router(state, &settings);

    // Create socket address
    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("");
    info!("📚 API Endpoints:");
    info!("   ─── Systems ───");
    info!("   POST /api/systems/register          - Register an AI system");
    info!("   GET  /api/systems                   - List registered systems");
    info!("   GET  /api/systems/:id               - Get a system record");
    info!("");
    info!("   ─── Compliance ───");
    info!("   POST /api/compliance/assess/:id     - Run compliance assessment");
    info!("   GET  /api/compliance/dashboard      - Governance dashboard");
    info!("");
    info!("   ─── Workflows ───");
    info!("   POST /api/workflows/initiate        - Initiate workflow");
    info!("   GET  /api/workflows                 - List workflows");
    info!("   GET  /api/workflows/:id/status      - Workflow status");
    info!("   POST /api/workflows/:id/execute     - Execute next step");
    info!("   POST /api/workflows/:id/approve     - Approve/reject step");
    info!("   POST /api/workflows/:id/cancel      - Cancel workflow");
    info!("");
    info!("   ─── Domain Managers ───");
    info!("   POST /api/model-risk/validate/:id   - Validate a model");
    info!("   GET  /api/model-risk/report/:id     - Model risk report");
    info!("   POST /api/oversight/decisions/:id   - Log AI decision");
    info!("   POST /api/residency/transfers/validate - Validate data transfer");
    info!("");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,aigov_api=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
