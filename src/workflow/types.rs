//! Workflow data model
//!
//! Templates are immutable definitions; instances carry the mutable
//! runtime state. The `current_step` cursor only moves forward and an
//! instance is either active (pending/running) or finished, derived
//! from its status alone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// Workflow execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl WorkflowStatus {
    /// Terminal states admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkflowStatus::Completed | WorkflowStatus::Failed | WorkflowStatus::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Pending => "pending",
            WorkflowStatus::Running => "running",
            WorkflowStatus::Completed => "completed",
            WorkflowStatus::Failed => "failed",
            WorkflowStatus::Cancelled => "cancelled",
        }
    }
}

/// Types of governance workflows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowType {
    SystemRegistration,
    ComplianceAssessment,
    ModelValidation,
    RiskAssessment,
    AuditReview,
    PolicyUpdate,
}

impl WorkflowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowType::SystemRegistration => "system_registration",
            WorkflowType::ComplianceAssessment => "compliance_assessment",
            WorkflowType::ModelValidation => "model_validation",
            WorkflowType::RiskAssessment => "risk_assessment",
            WorkflowType::AuditReview => "audit_review",
            WorkflowType::PolicyUpdate => "policy_update",
        }
    }
}

/// Whether a step runs by itself or needs a human
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Automated,
    Manual,
}

/// Immutable definition of one workflow step, owned by its template
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDefinition {
    pub name: String,
    pub kind: StepKind,
    /// Opaque action identifier dispatched to the handler registry
    pub action: String,
    #[serde(default)]
    pub requires_approval: bool,
    #[serde(default)]
    pub approvers: Vec<String>,
}

/// Immutable workflow definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowTemplate {
    pub template_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub workflow_type: WorkflowType,
    pub steps: Vec<StepDefinition>,
    #[serde(default)]
    pub auto_start: bool,
}

/// Per-step execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// Approve/reject decision on a step. Any other literal is rejected at
/// the serialization boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalDecision {
    Approved,
    Rejected,
}

/// Materialized per-instance copy of a step definition with mutable state
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepState {
    pub definition: StepDefinition,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_status: Option<ApprovalDecision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<DateTime<Utc>>,
}

impl StepState {
    pub fn new(definition: StepDefinition) -> Self {
        Self {
            definition,
            status: StepStatus::Pending,
            started_at: None,
            completed_at: None,
            result: None,
            error: None,
            approval_status: None,
            approved_by: None,
            approved_at: None,
        }
    }
}

/// Immutable record of one approve/reject decision
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRecord {
    pub workflow_id: Uuid,
    pub step_index: usize,
    pub approver: String,
    pub decision: ApprovalDecision,
    pub comments: String,
    pub decided_at: DateTime<Utc>,
}

/// Outcome of one step execution attempt, returned to the caller
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum StepOutcome {
    Completed {
        result: Value,
    },
    Failed {
        error: String,
    },
    PendingApproval {
        required_approvers: Vec<String>,
    },
    PendingManualAction,
}

impl StepOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            StepOutcome::Completed { .. } => "completed",
            StepOutcome::Failed { .. } => "failed",
            StepOutcome::PendingApproval { .. } => "pending_approval",
            StepOutcome::PendingManualAction => "pending_manual_action",
        }
    }
}

/// Audit entry for one execution attempt; appended on every call,
/// including no-op and pending outcomes
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionLogEntry {
    pub step_index: usize,
    pub step_name: String,
    pub executed_at: DateTime<Utc>,
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_data: Option<HashMap<String, Value>>,
}

/// Summary compiled when a workflow finishes
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowResults {
    pub total_steps: usize,
    pub successful_steps: usize,
    pub failed_steps: usize,
    pub step_results: Vec<StepResultSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResultSnapshot {
    pub step_name: String,
    pub result: Value,
}

/// The mutable runtime entity, created by `initiate_workflow`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowInstance {
    pub workflow_id: Uuid,
    pub template_id: String,
    pub workflow_type: WorkflowType,
    pub status: WorkflowStatus,
    pub context: HashMap<String, Value>,
    pub steps: Vec<StepState>,
    /// Monotonic cursor into `steps`; never exceeds `steps.len()`
    pub current_step: usize,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub approvals: Vec<ApprovalRecord>,
    pub execution_log: Vec<ExecutionLogEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<WorkflowResults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
}

impl WorkflowInstance {
    pub fn new(template: &WorkflowTemplate, context: HashMap<String, Value>) -> Self {
        Self {
            workflow_id: Uuid::new_v4(),
            template_id: template.template_id.clone(),
            workflow_type: template.workflow_type,
            status: WorkflowStatus::Pending,
            context,
            steps: template
                .steps
                .iter()
                .cloned()
                .map(StepState::new)
                .collect(),
            current_step: 0,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            approvals: Vec::new(),
            execution_log: Vec::new(),
            results: None,
            cancellation_reason: None,
        }
    }

    /// Progress as a percentage of completed steps
    pub fn progress_percentage(&self) -> f64 {
        if self.steps.is_empty() {
            0.0
        } else {
            self.current_step as f64 / self.steps.len() as f64 * 100.0
        }
    }
}

/// A step awaiting approval, surfaced by the status projection
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingApproval {
    pub step_index: usize,
    pub step_name: String,
    pub required_approvers: Vec<String>,
}

/// Read-side status view, derived from instance state alone
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStatusView {
    pub workflow_id: Uuid,
    pub status: WorkflowStatus,
    pub workflow_type: WorkflowType,
    pub total_steps: usize,
    pub completed_steps: usize,
    pub current_step_name: String,
    pub progress_percentage: f64,
    pub pending_approvals: Vec<PendingApproval>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_seconds: Option<f64>,
}

/// One row in the workflow listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSummary {
    pub workflow_id: Uuid,
    pub workflow_type: WorkflowType,
    pub status: WorkflowStatus,
    pub created_at: DateTime<Utc>,
    pub progress_percentage: f64,
}

/// Listing with aggregate counts per status and per type
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowListing {
    pub total_workflows: usize,
    pub status_distribution: HashMap<String, usize>,
    pub type_distribution: HashMap<String, usize>,
    pub workflows: Vec<WorkflowSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!WorkflowStatus::Pending.is_terminal());
        assert!(!WorkflowStatus::Running.is_terminal());
        assert!(WorkflowStatus::Completed.is_terminal());
        assert!(WorkflowStatus::Failed.is_terminal());
        assert!(WorkflowStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_approval_decision_rejects_unknown_literal() {
        assert!(serde_json::from_str::<ApprovalDecision>("\"approved\"").is_ok());
        assert!(serde_json::from_str::<ApprovalDecision>("\"rejected\"").is_ok());
        assert!(serde_json::from_str::<ApprovalDecision>("\"maybe\"").is_err());
    }

    #[test]
    fn test_instance_materializes_step_states() {
        let template = WorkflowTemplate {
            template_id: "t".to_string(),
            name: "Test".to_string(),
            description: String::new(),
            workflow_type: WorkflowType::RiskAssessment,
            steps: vec![StepDefinition {
                name: "Step".to_string(),
                kind: StepKind::Automated,
                action: "noop".to_string(),
                requires_approval: false,
                approvers: vec![],
            }],
            auto_start: false,
        };

        let instance = WorkflowInstance::new(&template, HashMap::new());
        assert_eq!(instance.status, WorkflowStatus::Pending);
        assert_eq!(instance.current_step, 0);
        assert_eq!(instance.steps.len(), 1);
        assert_eq!(instance.steps[0].status, StepStatus::Pending);
        assert_eq!(instance.progress_percentage(), 0.0);
    }

    #[test]
    fn test_progress_of_empty_template_is_zero() {
        let template = WorkflowTemplate {
            template_id: "t".to_string(),
            name: "Empty".to_string(),
            description: String::new(),
            workflow_type: WorkflowType::AuditReview,
            steps: vec![],
            auto_start: false,
        };
        let instance = WorkflowInstance::new(&template, HashMap::new());
        assert_eq!(instance.progress_percentage(), 0.0);
    }
}
