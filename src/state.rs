//! Application state management
//!
//! Contains shared state accessible across all handlers.
//! IN-MEMORY ONLY: all governance and workflow state lives in process
//! memory and is lost on restart; there is no persistence layer.

use crate::config::Settings;
use crate::governance::GovernanceService;
use crate::workflow::WorkflowOrchestrator;
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState {
    /// Governance framework aggregating the five domain managers
    pub governance: GovernanceService,

    /// Workflow orchestrator (has internal locking)
    pub workflows: WorkflowOrchestrator,
}

impl AppState {
    /// Create new application state from settings
    pub fn new(settings: &Settings) -> Self {
        Self {
            governance: GovernanceService::new(settings.governance.compliance_threshold),
            workflows: WorkflowOrchestrator::new(),
        }
    }
}

/// Type alias for shared state
pub type SharedState = Arc<AppState>;
