//! Workflow Orchestrator
//!
//! Runs named sequences of steps against a context, tracking per-step
//! approval and completion state. One authoritative map holds every
//! instance; the active/completed partition is derived from status.
//!
//! State machine: pending -> running -> completed | failed | cancelled.
//! The step cursor only moves forward, and only through the execution
//! path - approvals alone never advance it.

use crate::error::AppError;
use crate::workflow::actions::{ActionContext, ActionRegistry};
use crate::workflow::templates::builtin_templates;
use crate::workflow::types::{
    ApprovalDecision, ApprovalRecord, ExecutionLogEntry, PendingApproval, StepKind, StepOutcome,
    StepResultSnapshot, StepStatus, WorkflowInstance, WorkflowListing, WorkflowResults,
    WorkflowStatus, WorkflowStatusView, WorkflowSummary, WorkflowTemplate, WorkflowType,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// Response returned when a workflow is initiated
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiationResult {
    pub workflow_id: Uuid,
    pub workflow_type: WorkflowType,
    pub status: WorkflowStatus,
}

struct OrchestratorState {
    templates: HashMap<String, WorkflowTemplate>,
    workflows: HashMap<Uuid, WorkflowInstance>,
    actions: ActionRegistry,
}

/// Thread-safe workflow orchestrator. A single lock guards all
/// orchestrator state; instances are never deleted, only finished.
pub struct WorkflowOrchestrator {
    inner: RwLock<OrchestratorState>,
}

impl WorkflowOrchestrator {
    pub fn new() -> Self {
        Self::with_registry(ActionRegistry::with_builtin_actions())
    }

    pub fn with_registry(actions: ActionRegistry) -> Self {
        let mut templates = HashMap::new();
        for template in builtin_templates() {
            templates.insert(template.template_id.clone(), template);
        }
        Self {
            inner: RwLock::new(OrchestratorState {
                templates,
                workflows: HashMap::new(),
                actions,
            }),
        }
    }

    /// Register a new workflow template. Templates are immutable after
    /// creation, so re-registering an id is rejected.
    pub async fn register_template(&self, template: WorkflowTemplate) -> Result<(), AppError> {
        let mut state = self.inner.write().await;
        if state.templates.contains_key(&template.template_id) {
            return Err(AppError::Validation(format!(
                "Template {} already registered",
                template.template_id
            )));
        }
        info!(template_id = %template.template_id, "workflow template registered");
        state
            .templates
            .insert(template.template_id.clone(), template);
        Ok(())
    }

    /// All registered templates
    pub async fn list_templates(&self) -> Vec<WorkflowTemplate> {
        let state = self.inner.read().await;
        let mut templates: Vec<WorkflowTemplate> = state.templates.values().cloned().collect();
        templates.sort_by(|a, b| a.template_id.cmp(&b.template_id));
        templates
    }

    /// Initiate a new workflow instance from a template
    pub async fn initiate_workflow(
        &self,
        template_id: &str,
        context: HashMap<String, Value>,
    ) -> Result<InitiationResult, AppError> {
        let mut state = self.inner.write().await;

        let template = state
            .templates
            .get(template_id)
            .ok_or_else(|| AppError::NotFound(format!("Template {} not found", template_id)))?;
        let auto_start = template.auto_start;

        let instance = WorkflowInstance::new(template, context);
        let workflow_id = instance.workflow_id;
        info!(
            %workflow_id,
            template_id,
            workflow_type = instance.workflow_type.as_str(),
            "workflow initiated"
        );
        state.workflows.insert(workflow_id, instance);

        if auto_start {
            state.start(workflow_id)?;
        }

        let instance = &state.workflows[&workflow_id];
        Ok(InitiationResult {
            workflow_id,
            workflow_type: instance.workflow_type,
            status: instance.status,
        })
    }

    /// Explicitly start a pending workflow
    pub async fn start_workflow(&self, workflow_id: Uuid) -> Result<WorkflowStatus, AppError> {
        let mut state = self.inner.write().await;
        let instance = state.instance(workflow_id)?;
        if instance.status != WorkflowStatus::Pending {
            return Err(AppError::InvalidState(format!(
                "Workflow {} is not pending",
                workflow_id
            )));
        }
        state.start(workflow_id)?;
        Ok(state.workflows[&workflow_id].status)
    }

    /// Execute the next step in a workflow
    pub async fn execute_workflow_step(
        &self,
        workflow_id: Uuid,
        step_data: Option<HashMap<String, Value>>,
    ) -> Result<StepOutcome, AppError> {
        let mut state = self.inner.write().await;
        state.execute_step(workflow_id, step_data)
    }

    /// Approve or reject a workflow step. Stamps the step on approval
    /// (without advancing the cursor) and fails the whole workflow on
    /// rejection.
    pub async fn approve_workflow_step(
        &self,
        workflow_id: Uuid,
        step_index: usize,
        approver: &str,
        decision: ApprovalDecision,
        comments: String,
    ) -> Result<ApprovalRecord, AppError> {
        let mut state = self.inner.write().await;
        let instance = state.instance_mut(workflow_id)?;

        if step_index >= instance.steps.len() {
            return Err(AppError::Validation(format!(
                "Step index {} out of range for workflow {}",
                step_index, workflow_id
            )));
        }

        let record = ApprovalRecord {
            workflow_id,
            step_index,
            approver: approver.to_string(),
            decision,
            comments,
            decided_at: Utc::now(),
        };
        instance.approvals.push(record.clone());

        match decision {
            ApprovalDecision::Approved => {
                let step = &mut instance.steps[step_index];
                step.approval_status = Some(ApprovalDecision::Approved);
                step.approved_by = Some(approver.to_string());
                step.approved_at = Some(Utc::now());
                info!(%workflow_id, step_index, approver, "workflow step approved");
            }
            ApprovalDecision::Rejected => {
                instance.steps[step_index].approval_status = Some(ApprovalDecision::Rejected);
                // No resurrection: a rejection only fails a live workflow
                if !instance.status.is_terminal() {
                    instance.status = WorkflowStatus::Failed;
                    instance.completed_at = Some(Utc::now());
                    info!(%workflow_id, step_index, approver, "workflow rejected");
                }
            }
        }

        Ok(record)
    }

    /// Cancel a non-terminal workflow
    pub async fn cancel_workflow(
        &self,
        workflow_id: Uuid,
        reason: String,
    ) -> Result<(), AppError> {
        let mut state = self.inner.write().await;
        let instance = state.instance_mut(workflow_id)?;

        if instance.status.is_terminal() {
            return Err(AppError::InvalidState(format!(
                "Workflow {} cannot be cancelled in current state",
                workflow_id
            )));
        }

        instance.status = WorkflowStatus::Cancelled;
        instance.completed_at = Some(Utc::now());
        instance.cancellation_reason = Some(reason);
        info!(%workflow_id, "workflow cancelled");
        Ok(())
    }

    /// Read-side status projection; derived from instance state alone
    pub async fn get_workflow_status(
        &self,
        workflow_id: Uuid,
    ) -> Result<WorkflowStatusView, AppError> {
        let state = self.inner.read().await;
        let instance = state.instance(workflow_id)?;

        let total = instance.steps.len();
        let current_step_name = if instance.current_step < total {
            instance.steps[instance.current_step].definition.name.clone()
        } else {
            "Completed".to_string()
        };

        let pending_approvals: Vec<PendingApproval> = instance
            .steps
            .iter()
            .enumerate()
            .skip(instance.current_step)
            .filter(|(_, step)| step.definition.requires_approval && step.approval_status.is_none())
            .map(|(i, step)| PendingApproval {
                step_index: i,
                step_name: step.definition.name.clone(),
                required_approvers: step.definition.approvers.clone(),
            })
            .collect();

        let execution_seconds = instance.started_at.map(|started| {
            let end = instance.completed_at.unwrap_or_else(Utc::now);
            (end - started).num_milliseconds() as f64 / 1000.0
        });

        Ok(WorkflowStatusView {
            workflow_id,
            status: instance.status,
            workflow_type: instance.workflow_type,
            total_steps: total,
            completed_steps: instance.current_step,
            current_step_name,
            progress_percentage: instance.progress_percentage(),
            pending_approvals,
            created_at: instance.created_at,
            started_at: instance.started_at,
            completed_at: instance.completed_at,
            execution_seconds,
        })
    }

    /// Full instance snapshot, execution log included
    pub async fn get_workflow(&self, workflow_id: Uuid) -> Result<WorkflowInstance, AppError> {
        let state = self.inner.read().await;
        state.instance(workflow_id).cloned()
    }

    /// List workflows with optional status/type filters, newest first.
    /// The whole in-memory set is scanned; there is no pagination.
    pub async fn list_workflows(
        &self,
        status_filter: Option<WorkflowStatus>,
        type_filter: Option<WorkflowType>,
    ) -> WorkflowListing {
        let state = self.inner.read().await;

        let mut matching: Vec<&WorkflowInstance> = state
            .workflows
            .values()
            .filter(|w| status_filter.map_or(true, |s| w.status == s))
            .filter(|w| type_filter.map_or(true, |t| w.workflow_type == t))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut status_distribution: HashMap<String, usize> = HashMap::new();
        let mut type_distribution: HashMap<String, usize> = HashMap::new();
        for workflow in &matching {
            *status_distribution
                .entry(workflow.status.as_str().to_string())
                .or_insert(0) += 1;
            *type_distribution
                .entry(workflow.workflow_type.as_str().to_string())
                .or_insert(0) += 1;
        }

        WorkflowListing {
            total_workflows: matching.len(),
            status_distribution,
            type_distribution,
            workflows: matching
                .iter()
                .map(|w| WorkflowSummary {
                    workflow_id: w.workflow_id,
                    workflow_type: w.workflow_type,
                    status: w.status,
                    created_at: w.created_at,
                    progress_percentage: w.progress_percentage(),
                })
                .collect(),
        }
    }

}

impl Default for WorkflowOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl OrchestratorState {
    fn instance(&self, workflow_id: Uuid) -> Result<&WorkflowInstance, AppError> {
        self.workflows
            .get(&workflow_id)
            .ok_or_else(|| AppError::NotFound(format!("Workflow {} not found", workflow_id)))
    }

    fn instance_mut(&mut self, workflow_id: Uuid) -> Result<&mut WorkflowInstance, AppError> {
        self.workflows
            .get_mut(&workflow_id)
            .ok_or_else(|| AppError::NotFound(format!("Workflow {} not found", workflow_id)))
    }

    /// Move a workflow to running and kick off its first step if automated
    fn start(&mut self, workflow_id: Uuid) -> Result<(), AppError> {
        let instance = self.instance_mut(workflow_id)?;
        instance.status = WorkflowStatus::Running;
        instance.started_at = Some(Utc::now());

        let first_is_automated = instance
            .steps
            .first()
            .map(|s| s.definition.kind == StepKind::Automated)
            .unwrap_or(false);
        if first_is_automated {
            self.execute_step(workflow_id, None)?;
        }
        Ok(())
    }

    fn execute_step(
        &mut self,
        workflow_id: Uuid,
        step_data: Option<HashMap<String, Value>>,
    ) -> Result<StepOutcome, AppError> {
        let instance = self
            .workflows
            .get_mut(&workflow_id)
            .ok_or_else(|| AppError::NotFound(format!("Workflow {} not found", workflow_id)))?;

        if instance.status != WorkflowStatus::Running {
            return Err(AppError::InvalidState(format!(
                "Workflow {} is not in running state",
                workflow_id
            )));
        }

        let index = instance.current_step;
        if index >= instance.steps.len() {
            return Err(AppError::InvalidState(format!(
                "Workflow {} has no more steps to execute",
                workflow_id
            )));
        }

        let definition = instance.steps[index].definition.clone();
        let actions = &self.actions;
        let outcome = match definition.kind {
            StepKind::Automated => {
                instance.steps[index].status = StepStatus::Running;
                instance.steps[index].started_at = Some(Utc::now());

                let context: &ActionContext = &instance.context;
                match actions.dispatch(&definition.action, context) {
                    Ok(result) => StepOutcome::Completed { result },
                    Err(e) => StepOutcome::Failed {
                        error: e.to_string(),
                    },
                }
            }
            StepKind::Manual => {
                if definition.requires_approval {
                    let step = &instance.steps[index];
                    if step.approval_status == Some(ApprovalDecision::Approved) {
                        // Approval received; the manual step now completes
                        StepOutcome::Completed {
                            result: json!({
                                "action": definition.action,
                                "status": "completed",
                                "approved_by": step.approved_by,
                            }),
                        }
                    } else {
                        StepOutcome::PendingApproval {
                            required_approvers: definition.approvers.clone(),
                        }
                    }
                } else {
                    StepOutcome::PendingManualAction
                }
            }
        };

        // Every execution attempt is audited, pending outcomes included
        instance.execution_log.push(ExecutionLogEntry {
            step_index: index,
            step_name: definition.name.clone(),
            executed_at: Utc::now(),
            outcome: outcome.label().to_string(),
            step_data,
        });

        match &outcome {
            StepOutcome::Completed { result } => {
                let step = &mut instance.steps[index];
                step.status = StepStatus::Completed;
                step.completed_at = Some(Utc::now());
                step.result = Some(result.clone());

                instance.current_step += 1;
                if instance.current_step >= instance.steps.len() {
                    Self::finalize(instance);
                }
            }
            StepOutcome::Failed { error } => {
                let step = &mut instance.steps[index];
                step.status = StepStatus::Failed;
                step.completed_at = Some(Utc::now());
                step.error = Some(error.clone());

                instance.status = WorkflowStatus::Failed;
                instance.completed_at = Some(Utc::now());
                info!(%workflow_id, step = %definition.name, "workflow failed");
            }
            StepOutcome::PendingApproval { .. } | StepOutcome::PendingManualAction => {
                // Cursor stays; the step waits for a human
            }
        }

        Ok(outcome)
    }

    /// Complete a workflow and compile its results summary
    fn finalize(instance: &mut WorkflowInstance) {
        instance.status = WorkflowStatus::Completed;
        instance.completed_at = Some(Utc::now());

        let successful = instance
            .steps
            .iter()
            .filter(|s| s.status == StepStatus::Completed)
            .count();
        let failed = instance
            .steps
            .iter()
            .filter(|s| s.status == StepStatus::Failed)
            .count();

        instance.results = Some(WorkflowResults {
            total_steps: instance.steps.len(),
            successful_steps: successful,
            failed_steps: failed,
            step_results: instance
                .steps
                .iter()
                .filter_map(|s| {
                    s.result.as_ref().map(|r| StepResultSnapshot {
                        step_name: s.definition.name.clone(),
                        result: r.clone(),
                    })
                })
                .collect(),
            duration_seconds: instance.started_at.zip(instance.completed_at).map(
                |(start, end)| (end - start).num_milliseconds() as f64 / 1000.0,
            ),
        });
        info!(workflow_id = %instance.workflow_id, "workflow completed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::actions::ActionError;
    use crate::workflow::types::StepDefinition;
    use pretty_assertions::assert_eq;

    fn automated_step(name: &str, action: &str) -> StepDefinition {
        StepDefinition {
            name: name.to_string(),
            kind: StepKind::Automated,
            action: action.to_string(),
            requires_approval: false,
            approvers: vec![],
        }
    }

    fn approval_step(name: &str, approvers: Vec<&str>) -> StepDefinition {
        StepDefinition {
            name: name.to_string(),
            kind: StepKind::Manual,
            action: name.to_lowercase().replace(' ', "_"),
            requires_approval: true,
            approvers: approvers.into_iter().map(String::from).collect(),
        }
    }

    fn template(
        id: &str,
        workflow_type: WorkflowType,
        steps: Vec<StepDefinition>,
        auto_start: bool,
    ) -> WorkflowTemplate {
        WorkflowTemplate {
            template_id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            workflow_type,
            steps,
            auto_start,
        }
    }

    fn context(system_id: &str) -> HashMap<String, Value> {
        HashMap::from([("system_id".to_string(), json!(system_id))])
    }

    async fn assert_invariants(orchestrator: &WorkflowOrchestrator, workflow_id: Uuid) {
        let instance = orchestrator.get_workflow(workflow_id).await.unwrap();
        assert!(instance.current_step <= instance.steps.len());
        for step in &instance.steps[..instance.current_step] {
            assert_eq!(step.status, StepStatus::Completed);
        }
    }

    #[tokio::test]
    async fn test_auto_start_executes_first_automated_step() {
        let orchestrator = WorkflowOrchestrator::new();
        let result = orchestrator
            .initiate_workflow("compliance_assessment", context("s1"))
            .await
            .unwrap();

        assert_eq!(result.status, WorkflowStatus::Running);

        let status = orchestrator
            .get_workflow_status(result.workflow_id)
            .await
            .unwrap();
        assert_eq!(status.completed_steps, 1);
        assert_eq!(status.current_step_name, "AI Oversight Assessment");
        assert_invariants(&orchestrator, result.workflow_id).await;
    }

    #[tokio::test]
    async fn test_unknown_template_is_not_found() {
        let orchestrator = WorkflowOrchestrator::new();
        let err = orchestrator
            .initiate_workflow("invalid_workflow_type", context("s1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_all_automated_template_runs_to_completion() {
        let orchestrator = WorkflowOrchestrator::new();
        orchestrator
            .register_template(template(
                "checks",
                WorkflowType::RiskAssessment,
                vec![
                    automated_step("One", "assess_risk"),
                    automated_step("Two", "assess_model_risk"),
                    automated_step("Three", "generate_report"),
                ],
                true,
            ))
            .await
            .unwrap();

        let result = orchestrator
            .initiate_workflow("checks", context("s1"))
            .await
            .unwrap();
        // Step 0 ran on auto-start; drive the remaining two
        orchestrator
            .execute_workflow_step(result.workflow_id, None)
            .await
            .unwrap();
        orchestrator
            .execute_workflow_step(result.workflow_id, None)
            .await
            .unwrap();

        let status = orchestrator
            .get_workflow_status(result.workflow_id)
            .await
            .unwrap();
        assert_eq!(status.status, WorkflowStatus::Completed);
        assert_eq!(status.progress_percentage, 100.0);
        assert_eq!(status.current_step_name, "Completed");

        let instance = orchestrator.get_workflow(result.workflow_id).await.unwrap();
        let results = instance.results.unwrap();
        assert_eq!(results.total_steps, 3);
        assert_eq!(results.successful_steps, 3);
        assert_eq!(results.failed_steps, 0);
        assert_eq!(results.step_results.len(), 3);
        assert_invariants(&orchestrator, result.workflow_id).await;
    }

    #[tokio::test]
    async fn test_example_scenario_approval_then_execute() {
        // Two-step template: automated noop, then manual approval-gated step
        let orchestrator = WorkflowOrchestrator::new();
        orchestrator
            .register_template(template(
                "review",
                WorkflowType::AuditReview,
                vec![
                    automated_step("Step A", "noop"),
                    approval_step("Step B", vec!["mgr"]),
                ],
                true,
            ))
            .await
            .unwrap();

        let result = orchestrator
            .initiate_workflow("review", context("s1"))
            .await
            .unwrap();
        let id = result.workflow_id;

        // Step A auto-executed on start
        let status = orchestrator.get_workflow_status(id).await.unwrap();
        assert_eq!(status.status, WorkflowStatus::Running);
        assert_eq!(status.completed_steps, 1);

        // Executing the manual step before approval leaves the cursor put
        let outcome = orchestrator.execute_workflow_step(id, None).await.unwrap();
        assert!(matches!(outcome, StepOutcome::PendingApproval { .. }));
        let status = orchestrator.get_workflow_status(id).await.unwrap();
        assert_eq!(status.completed_steps, 1);
        assert_eq!(status.pending_approvals.len(), 1);
        assert_eq!(status.pending_approvals[0].step_index, 1);

        // Approval stamps the step but does not advance by itself
        orchestrator
            .approve_workflow_step(id, 1, "mgr", ApprovalDecision::Approved, "ok".to_string())
            .await
            .unwrap();
        let status = orchestrator.get_workflow_status(id).await.unwrap();
        assert_eq!(status.completed_steps, 1);
        assert!(status.pending_approvals.is_empty());

        // Execution after approval completes the step and the workflow
        let outcome = orchestrator.execute_workflow_step(id, None).await.unwrap();
        assert!(matches!(outcome, StepOutcome::Completed { .. }));
        let status = orchestrator.get_workflow_status(id).await.unwrap();
        assert_eq!(status.status, WorkflowStatus::Completed);
        assert_eq!(status.completed_steps, 2);
        assert_invariants(&orchestrator, id).await;
    }

    #[tokio::test]
    async fn test_rejection_fails_workflow_and_blocks_execution() {
        let orchestrator = WorkflowOrchestrator::new();
        let result = orchestrator
            .initiate_workflow("system_registration", context("s1"))
            .await
            .unwrap();
        let id = result.workflow_id;

        orchestrator
            .approve_workflow_step(
                id,
                3,
                "risk_manager",
                ApprovalDecision::Rejected,
                "Insufficient documentation".to_string(),
            )
            .await
            .unwrap();

        let status = orchestrator.get_workflow_status(id).await.unwrap();
        assert_eq!(status.status, WorkflowStatus::Failed);

        // No subsequent step may execute
        let err = orchestrator.execute_workflow_step(id, None).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_rejection_does_not_resurrect_completed_workflow() {
        let orchestrator = WorkflowOrchestrator::new();
        orchestrator
            .register_template(template(
                "single",
                WorkflowType::RiskAssessment,
                vec![automated_step("Only", "noop")],
                true,
            ))
            .await
            .unwrap();

        let result = orchestrator
            .initiate_workflow("single", context("s1"))
            .await
            .unwrap();
        assert_eq!(result.status, WorkflowStatus::Completed);

        orchestrator
            .approve_workflow_step(
                result.workflow_id,
                0,
                "mgr",
                ApprovalDecision::Rejected,
                String::new(),
            )
            .await
            .unwrap();

        let status = orchestrator
            .get_workflow_status(result.workflow_id)
            .await
            .unwrap();
        assert_eq!(status.status, WorkflowStatus::Completed);
    }

    #[tokio::test]
    async fn test_out_of_range_approval_is_rejected() {
        let orchestrator = WorkflowOrchestrator::new();
        let result = orchestrator
            .initiate_workflow("compliance_assessment", context("s1"))
            .await
            .unwrap();

        let err = orchestrator
            .approve_workflow_step(
                result.workflow_id,
                99,
                "mgr",
                ApprovalDecision::Approved,
                String::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // The rejected call must not have appended an approval record
        let instance = orchestrator.get_workflow(result.workflow_id).await.unwrap();
        assert!(instance.approvals.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_and_double_cancel() {
        let orchestrator = WorkflowOrchestrator::new();
        let result = orchestrator
            .initiate_workflow("compliance_assessment", context("s1"))
            .await
            .unwrap();
        let id = result.workflow_id;

        orchestrator
            .cancel_workflow(id, "User requested cancellation".to_string())
            .await
            .unwrap();
        let status = orchestrator.get_workflow_status(id).await.unwrap();
        assert_eq!(status.status, WorkflowStatus::Cancelled);

        // The workflow left the active partition
        let running = orchestrator
            .list_workflows(Some(WorkflowStatus::Running), None)
            .await;
        assert_eq!(running.total_workflows, 0);

        let err = orchestrator
            .cancel_workflow(id, "again".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_execute_on_unknown_workflow() {
        let orchestrator = WorkflowOrchestrator::new();
        let err = orchestrator
            .execute_workflow_step(Uuid::new_v4(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_execute_on_pending_workflow_is_invalid() {
        let orchestrator = WorkflowOrchestrator::new();
        orchestrator
            .register_template(template(
                "deferred",
                WorkflowType::PolicyUpdate,
                vec![automated_step("One", "noop")],
                false,
            ))
            .await
            .unwrap();

        let result = orchestrator
            .initiate_workflow("deferred", context("s1"))
            .await
            .unwrap();
        assert_eq!(result.status, WorkflowStatus::Pending);

        let err = orchestrator
            .execute_workflow_step(result.workflow_id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));

        // Explicit start runs the first automated step; one step means done
        orchestrator.start_workflow(result.workflow_id).await.unwrap();
        let status = orchestrator
            .get_workflow_status(result.workflow_id)
            .await
            .unwrap();
        assert_eq!(status.status, WorkflowStatus::Completed);

        // Starting twice is invalid
        let err = orchestrator
            .start_workflow(result.workflow_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_no_more_steps_error_after_completion() {
        let orchestrator = WorkflowOrchestrator::new();
        orchestrator
            .register_template(template(
                "single",
                WorkflowType::RiskAssessment,
                vec![automated_step("Only", "noop")],
                true,
            ))
            .await
            .unwrap();

        let result = orchestrator
            .initiate_workflow("single", context("s1"))
            .await
            .unwrap();
        let err = orchestrator
            .execute_workflow_step(result.workflow_id, None)
            .await
            .unwrap_err();
        // Completed workflows are no longer running
        assert!(matches!(err, AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_failing_handler_fails_workflow_with_error_embedded() {
        let mut registry = ActionRegistry::with_builtin_actions();
        registry.register("explode", |_| Err(ActionError("handler blew up".to_string())));
        let orchestrator = WorkflowOrchestrator::with_registry(registry);

        orchestrator
            .register_template(template(
                "doomed",
                WorkflowType::ModelValidation,
                vec![
                    automated_step("Good", "assess_risk"),
                    automated_step("Bad", "explode"),
                ],
                true,
            ))
            .await
            .unwrap();

        let result = orchestrator
            .initiate_workflow("doomed", context("s1"))
            .await
            .unwrap();
        let outcome = orchestrator
            .execute_workflow_step(result.workflow_id, None)
            .await
            .unwrap();
        assert!(matches!(outcome, StepOutcome::Failed { .. }));

        let instance = orchestrator.get_workflow(result.workflow_id).await.unwrap();
        assert_eq!(instance.status, WorkflowStatus::Failed);
        assert_eq!(instance.steps[1].status, StepStatus::Failed);
        assert_eq!(instance.steps[1].error.as_deref(), Some("handler blew up"));
        // Cursor did not advance past the failed step
        assert_eq!(instance.current_step, 1);
    }

    #[tokio::test]
    async fn test_execution_log_captures_pending_outcomes() {
        let orchestrator = WorkflowOrchestrator::new();
        orchestrator
            .register_template(template(
                "manual",
                WorkflowType::AuditReview,
                vec![approval_step("Gate", vec!["mgr"])],
                true,
            ))
            .await
            .unwrap();

        let result = orchestrator
            .initiate_workflow("manual", context("s1"))
            .await
            .unwrap();
        let id = result.workflow_id;

        let step_data = HashMap::from([("note".to_string(), json!("first attempt"))]);
        orchestrator
            .execute_workflow_step(id, Some(step_data))
            .await
            .unwrap();
        orchestrator.execute_workflow_step(id, None).await.unwrap();

        let instance = orchestrator.get_workflow(id).await.unwrap();
        assert_eq!(instance.execution_log.len(), 2);
        assert_eq!(instance.execution_log[0].outcome, "pending_approval");
        assert_eq!(
            instance.execution_log[0]
                .step_data
                .as_ref()
                .unwrap()["note"],
            json!("first attempt")
        );
        // The no-op attempts never advanced the cursor
        assert_eq!(instance.current_step, 0);
    }

    #[tokio::test]
    async fn test_manual_step_without_approval_reports_pending_action() {
        let orchestrator = WorkflowOrchestrator::new();
        orchestrator
            .register_template(template(
                "manual_only",
                WorkflowType::PolicyUpdate,
                vec![StepDefinition {
                    name: "Hands On".to_string(),
                    kind: StepKind::Manual,
                    action: "hands_on".to_string(),
                    requires_approval: false,
                    approvers: vec![],
                }],
                true,
            ))
            .await
            .unwrap();

        let result = orchestrator
            .initiate_workflow("manual_only", context("s1"))
            .await
            .unwrap();
        let outcome = orchestrator
            .execute_workflow_step(result.workflow_id, None)
            .await
            .unwrap();
        assert!(matches!(outcome, StepOutcome::PendingManualAction));
    }

    #[tokio::test]
    async fn test_list_workflows_filters_literal_status() {
        let orchestrator = WorkflowOrchestrator::new();
        orchestrator
            .register_template(template(
                "single",
                WorkflowType::RiskAssessment,
                vec![automated_step("Only", "noop")],
                true,
            ))
            .await
            .unwrap();

        // One completed, one running, one cancelled
        orchestrator
            .initiate_workflow("single", context("s1"))
            .await
            .unwrap();
        orchestrator
            .initiate_workflow("compliance_assessment", context("s2"))
            .await
            .unwrap();
        let cancelled = orchestrator
            .initiate_workflow("compliance_assessment", context("s3"))
            .await
            .unwrap();
        orchestrator
            .cancel_workflow(cancelled.workflow_id, "n/a".to_string())
            .await
            .unwrap();

        let all = orchestrator.list_workflows(None, None).await;
        assert_eq!(all.total_workflows, 3);

        let completed = orchestrator
            .list_workflows(Some(WorkflowStatus::Completed), None)
            .await;
        assert_eq!(completed.total_workflows, 1);
        assert!(completed
            .workflows
            .iter()
            .all(|w| w.status == WorkflowStatus::Completed));

        // Failed and cancelled are distinct buckets, not folded into completed
        let cancelled_only = orchestrator
            .list_workflows(Some(WorkflowStatus::Cancelled), None)
            .await;
        assert_eq!(cancelled_only.total_workflows, 1);

        let by_type = orchestrator
            .list_workflows(None, Some(WorkflowType::ComplianceAssessment))
            .await;
        assert_eq!(by_type.total_workflows, 2);
        assert_eq!(by_type.status_distribution["running"], 1);
        assert_eq!(by_type.status_distribution["cancelled"], 1);
    }

    #[tokio::test]
    async fn test_duplicate_template_registration_is_rejected() {
        let orchestrator = WorkflowOrchestrator::new();
        let err = orchestrator
            .register_template(template(
                "compliance_assessment",
                WorkflowType::ComplianceAssessment,
                vec![],
                true,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_status_of_unknown_workflow() {
        let orchestrator = WorkflowOrchestrator::new();
        let err = orchestrator
            .get_workflow_status(Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
