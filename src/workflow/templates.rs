//! Built-in workflow templates
//!
//! The two governance workflows every deployment starts with. Further
//! templates can be registered through the orchestrator.

use crate::workflow::types::{StepDefinition, StepKind, WorkflowTemplate, WorkflowType};

/// Templates installed at orchestrator initialization
pub fn builtin_templates() -> Vec<WorkflowTemplate> {
    vec![system_registration(), compliance_assessment()]
}

/// Complete registration process for new AI systems
fn system_registration() -> WorkflowTemplate {
    WorkflowTemplate {
        template_id: "system_registration".to_string(),
        name: "AI System Registration".to_string(),
        description: "Complete registration process for new AI systems".to_string(),
        workflow_type: WorkflowType::SystemRegistration,
        steps: vec![
            StepDefinition {
                name: "Initial Registration".to_string(),
                kind: StepKind::Automated,
                action: "register_system".to_string(),
                requires_approval: false,
                approvers: vec![],
            },
            StepDefinition {
                name: "Risk Assessment".to_string(),
                kind: StepKind::Automated,
                action: "assess_risk".to_string(),
                requires_approval: false,
                approvers: vec![],
            },
            StepDefinition {
                name: "Governance Level Assignment".to_string(),
                kind: StepKind::Automated,
                action: "assign_governance_level".to_string(),
                requires_approval: false,
                approvers: vec![],
            },
            StepDefinition {
                name: "Management Review".to_string(),
                kind: StepKind::Manual,
                action: "management_review".to_string(),
                requires_approval: true,
                approvers: vec![
                    "ai_governance_manager".to_string(),
                    "risk_manager".to_string(),
                ],
            },
            StepDefinition {
                name: "Final Approval".to_string(),
                kind: StepKind::Manual,
                action: "final_approval".to_string(),
                requires_approval: true,
                approvers: vec!["chief_risk_officer".to_string()],
            },
        ],
        auto_start: true,
    }
}

/// Comprehensive compliance assessment for AI systems
fn compliance_assessment() -> WorkflowTemplate {
    let automated = |name: &str, action: &str| StepDefinition {
        name: name.to_string(),
        kind: StepKind::Automated,
        action: action.to_string(),
        requires_approval: false,
        approvers: vec![],
    };

    WorkflowTemplate {
        template_id: "compliance_assessment".to_string(),
        name: "Compliance Assessment".to_string(),
        description: "Comprehensive compliance assessment for AI systems".to_string(),
        workflow_type: WorkflowType::ComplianceAssessment,
        steps: vec![
            automated("Model Risk Assessment", "assess_model_risk"),
            automated("AI Oversight Assessment", "assess_ai_oversight"),
            automated("Data Governance Assessment", "assess_data_governance"),
            automated("Data Residency Assessment", "assess_data_residency"),
            automated("ISO Compliance Assessment", "assess_iso_compliance"),
            automated("Generate Compliance Report", "generate_report"),
            StepDefinition {
                name: "Compliance Review".to_string(),
                kind: StepKind::Manual,
                action: "compliance_review".to_string(),
                requires_approval: true,
                approvers: vec![
                    "compliance_officer".to_string(),
                    "ai_governance_manager".to_string(),
                ],
            },
        ],
        auto_start: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_templates_shape() {
        let templates = builtin_templates();
        assert_eq!(templates.len(), 2);

        let registration = &templates[0];
        assert_eq!(registration.template_id, "system_registration");
        assert_eq!(registration.steps.len(), 5);
        assert!(registration.auto_start);
        assert!(registration.steps[3].requires_approval);
        assert_eq!(registration.steps[3].approvers.len(), 2);

        let assessment = &templates[1];
        assert_eq!(assessment.template_id, "compliance_assessment");
        assert_eq!(assessment.steps.len(), 7);
        assert_eq!(assessment.steps[6].kind, StepKind::Manual);
    }
}
