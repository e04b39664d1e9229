//! AI Oversight
//!
//! Oversight mechanisms for AI systems: decision logging, audit trails,
//! transparency reporting and escalation of low-confidence decisions.

use crate::error::AppError;
use crate::governance::types::SystemProfile;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;
use uuid::Uuid;

/// Cap on retained decision log entries per system
const DECISION_RETENTION: usize = 10_000;
/// Cap on retained audit events per system
const AUDIT_RETENTION: usize = 5_000;
/// Decisions below this confidence are escalated automatically
const ESCALATION_CONFIDENCE_THRESHOLD: f64 = 0.7;

/// AI oversight levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OversightLevel {
    Basic,
    Enhanced,
    Comprehensive,
}

/// Types of AI decisions requiring oversight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DecisionType {
    #[default]
    Automated,
    HumanInLoop,
    HumanApproval,
}

impl DecisionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionType::Automated => "automated",
            DecisionType::HumanInLoop => "human_in_loop",
            DecisionType::HumanApproval => "human_approval",
        }
    }
}

/// Monitoring configuration derived from the oversight level
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringConfig {
    pub frequency: String,
    pub metrics: Vec<String>,
    pub alerts: Vec<String>,
}

/// Conditions that trigger decision escalation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum EscalationCondition {
    LowConfidence { threshold: f64 },
    HighErrorRate { threshold: f64 },
    HighBias { threshold: f64 },
    RegulatoryBreach,
}

/// Escalation rule attached to a system at registration
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EscalationRule {
    pub condition: EscalationCondition,
    pub action: String,
    pub severity: String,
}

/// Registration record for a system under oversight
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OversightRecord {
    pub system_id: String,
    pub system_name: String,
    pub oversight_level: OversightLevel,
    pub decision_type: DecisionType,
    pub registered_at: DateTime<Utc>,
    pub oversight_requirements: Vec<String>,
    pub monitoring_config: MonitoringConfig,
    pub escalation_rules: Vec<EscalationRule>,
}

/// Submitted decision data
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionSubmission {
    #[serde(default)]
    pub decision_type: DecisionType,
    #[serde(default)]
    pub inputs: HashMap<String, Value>,
    #[serde(default)]
    pub outputs: HashMap<String, Value>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub human_reviewer: Option<String>,
    #[serde(default)]
    pub context: HashMap<String, Value>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub risk_level: Option<String>,
}

/// A logged AI decision
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionLog {
    pub decision_id: Uuid,
    pub system_id: String,
    pub timestamp: DateTime<Utc>,
    pub decision_type: DecisionType,
    pub inputs: HashMap<String, Value>,
    pub outputs: HashMap<String, Value>,
    pub confidence: Option<f64>,
    pub human_reviewer: Option<String>,
    pub context: HashMap<String, Value>,
    pub explanation: String,
    pub risk_level: String,
}

/// An audit trail event
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub event_id: Uuid,
    pub system_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub event_data: Value,
}

/// Oversight compliance assessment
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OversightAssessment {
    pub system_id: String,
    pub assessed_at: DateTime<Utc>,
    pub oversight_level: OversightLevel,
    pub score: f64,
    pub monitoring_compliance: f64,
    pub audit_compliance: f64,
    pub transparency_compliance: f64,
    pub escalation_compliance: f64,
    pub recommendations: Vec<String>,
    pub next_review_date: DateTime<Utc>,
}

/// Aggregated decision analytics for transparency reporting
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransparencyReport {
    pub system_id: String,
    pub generated_at: DateTime<Utc>,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub total_decisions: usize,
    pub decision_types: HashMap<String, usize>,
    pub risk_distribution: HashMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_confidence: Option<f64>,
    pub human_oversight_rate: f64,
    pub explanation_coverage: f64,
    pub escalation_rate: f64,
    pub recommendations: Vec<String>,
}

/// Audit trail query result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditTrail {
    pub system_id: String,
    pub total_events: usize,
    pub filtered_events: usize,
    pub events: Vec<AuditEvent>,
}

/// Manages AI oversight including monitoring, audit trails, and transparency
#[derive(Default)]
pub struct OversightManager {
    registered_systems: HashMap<String, OversightRecord>,
    audit_trails: HashMap<String, Vec<AuditEvent>>,
    decision_logs: HashMap<String, Vec<DecisionLog>>,
}

impl OversightManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a system for AI oversight
    pub fn register_system(&mut self, profile: &SystemProfile) {
        let oversight_level = Self::determine_oversight_level(profile);
        let record = OversightRecord {
            system_id: profile.system_id.clone(),
            system_name: profile.name.clone(),
            oversight_level,
            decision_type: Self::determine_decision_type(profile),
            registered_at: Utc::now(),
            oversight_requirements: Self::oversight_requirements(oversight_level),
            monitoring_config: Self::monitoring_config(oversight_level),
            escalation_rules: Self::escalation_rules(oversight_level),
        };

        self.registered_systems
            .insert(profile.system_id.clone(), record.clone());
        self.audit_trails
            .insert(profile.system_id.clone(), Vec::new());
        self.decision_logs
            .insert(profile.system_id.clone(), Vec::new());

        self.log_audit_event(
            &profile.system_id,
            "system_registered",
            serde_json::json!({
                "oversight_level": record.oversight_level,
                "decision_type": record.decision_type,
            }),
        );
    }

    /// Assess oversight compliance for a registered system
    pub fn assess_oversight_compliance(
        &mut self,
        system_id: &str,
    ) -> Result<OversightAssessment, AppError> {
        let record = self.record(system_id)?.clone();

        let monitoring = Self::monitoring_compliance(record.oversight_level);
        let audit = self.audit_compliance(system_id);
        let transparency = self.transparency_compliance(system_id);
        let escalation = 85.0;

        let score = monitoring * 0.3 + audit * 0.25 + transparency * 0.25 + escalation * 0.2;

        let assessment = OversightAssessment {
            system_id: system_id.to_string(),
            assessed_at: Utc::now(),
            oversight_level: record.oversight_level,
            score,
            monitoring_compliance: monitoring,
            audit_compliance: audit,
            transparency_compliance: transparency,
            escalation_compliance: escalation,
            recommendations: self.recommendations(system_id, score),
            next_review_date: Utc::now() + Duration::days(30),
        };

        self.log_audit_event(
            system_id,
            "compliance_assessment",
            serde_json::json!({ "score": score }),
        );

        Ok(assessment)
    }

    /// Log an AI decision for audit and oversight
    pub fn log_decision(
        &mut self,
        system_id: &str,
        submission: DecisionSubmission,
    ) -> Result<Uuid, AppError> {
        self.record(system_id)?;

        let decision = DecisionLog {
            decision_id: Uuid::new_v4(),
            system_id: system_id.to_string(),
            timestamp: Utc::now(),
            decision_type: submission.decision_type,
            inputs: submission.inputs,
            outputs: submission.outputs,
            confidence: submission.confidence,
            human_reviewer: submission.human_reviewer,
            context: submission.context,
            explanation: submission.explanation,
            risk_level: submission.risk_level.unwrap_or_else(|| "medium".to_string()),
        };
        let decision_id = decision.decision_id;
        let confidence = decision.confidence;

        let log = self.decision_logs.entry(system_id.to_string()).or_default();
        log.push(decision);
        if log.len() > DECISION_RETENTION {
            let excess = log.len() - DECISION_RETENTION;
            log.drain(..excess);
        }

        // Auto-escalation on low confidence
        if let Some(confidence) = confidence {
            if confidence < ESCALATION_CONFIDENCE_THRESHOLD {
                self.escalate_decision(
                    system_id,
                    decision_id,
                    format!("Low confidence: {}", confidence),
                    "automated_system",
                )?;
            }
        }

        Ok(decision_id)
    }

    /// Escalate a decision for human review
    pub fn escalate_decision(
        &mut self,
        system_id: &str,
        decision_id: Uuid,
        reason: String,
        escalated_by: &str,
    ) -> Result<Uuid, AppError> {
        self.record(system_id)?;

        let decision = self
            .decision_logs
            .get(system_id)
            .and_then(|log| log.iter().find(|d| d.decision_id == decision_id))
            .ok_or_else(|| AppError::NotFound(format!("Decision {} not found", decision_id)))?;

        let escalation_id = Uuid::new_v4();
        warn!(
            system_id,
            %decision_id,
            reason = %reason,
            "decision escalated for human review"
        );
        let event_data = serde_json::json!({
            "escalation_id": escalation_id,
            "decision_id": decision_id,
            "escalation_reason": reason,
            "escalated_by": escalated_by,
            "status": "pending_review",
            "original_risk_level": decision.risk_level,
        });
        self.log_audit_event(system_id, "decision_escalated", event_data);

        Ok(escalation_id)
    }

    /// Retrieve the audit trail for a system
    pub fn get_audit_trail(
        &self,
        system_id: &str,
        event_type: Option<&str>,
        limit: usize,
    ) -> Result<AuditTrail, AppError> {
        self.record(system_id)?;

        let all_events = self.audit_trails.get(system_id).cloned().unwrap_or_default();
        let total = all_events.len();

        let mut events: Vec<AuditEvent> = all_events
            .into_iter()
            .filter(|e| event_type.map_or(true, |t| e.event_type == t))
            .collect();
        let keep = events.len().saturating_sub(limit);
        events.drain(..keep);

        Ok(AuditTrail {
            system_id: system_id.to_string(),
            total_events: total,
            filtered_events: events.len(),
            events,
        })
    }

    /// Generate transparency report for AI system decisions
    pub fn generate_transparency_report(
        &self,
        system_id: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<TransparencyReport, AppError> {
        self.record(system_id)?;

        let decisions: Vec<&DecisionLog> = self
            .decision_logs
            .get(system_id)
            .map(|log| {
                log.iter()
                    .filter(|d| start.map_or(true, |s| d.timestamp >= s))
                    .filter(|d| end.map_or(true, |e| d.timestamp <= e))
                    .collect()
            })
            .unwrap_or_default();

        if decisions.is_empty() {
            return Err(AppError::NotFound(
                "No decisions found for the specified period".to_string(),
            ));
        }

        let mut decision_types: HashMap<String, usize> = HashMap::new();
        let mut risk_distribution: HashMap<String, usize> = HashMap::new();
        for d in &decisions {
            *decision_types
                .entry(d.decision_type.as_str().to_string())
                .or_insert(0) += 1;
            *risk_distribution.entry(d.risk_level.clone()).or_insert(0) += 1;
        }

        let confidences: Vec<f64> = decisions.iter().filter_map(|d| d.confidence).collect();
        let (average, min, max) = if confidences.is_empty() {
            (None, None, None)
        } else {
            (
                Some(confidences.iter().sum::<f64>() / confidences.len() as f64),
                confidences.iter().cloned().reduce(f64::min),
                confidences.iter().cloned().reduce(f64::max),
            )
        };

        let human = decisions.iter().filter(|d| d.human_reviewer.is_some()).count();
        let human_oversight_rate = human as f64 / decisions.len() as f64 * 100.0;

        let explained = decisions.iter().filter(|d| !d.explanation.is_empty()).count();
        let explanation_coverage = explained as f64 / decisions.len() as f64 * 100.0;

        let escalated = self
            .audit_trails
            .get(system_id)
            .map(|t| t.iter().filter(|e| e.event_type == "decision_escalated").count())
            .unwrap_or(0);
        let escalation_rate = escalated as f64 / decisions.len() as f64 * 100.0;

        let mut recommendations = Vec::new();
        if explanation_coverage < 80.0 {
            recommendations.push(format!(
                "Improve explanation coverage (currently {:.1}%)",
                explanation_coverage
            ));
        }
        if human_oversight_rate < 10.0 {
            recommendations.push(format!(
                "Consider increasing human oversight (currently {:.1}%)",
                human_oversight_rate
            ));
        }
        if escalation_rate > 15.0 {
            recommendations.push("High escalation rate - review decision thresholds".to_string());
        } else if escalation_rate < 2.0 {
            recommendations
                .push("Low escalation rate - ensure escalation rules are working".to_string());
        }

        Ok(TransparencyReport {
            system_id: system_id.to_string(),
            generated_at: Utc::now(),
            period_start: start.unwrap_or_else(|| decisions[0].timestamp),
            period_end: end.unwrap_or_else(|| decisions[decisions.len() - 1].timestamp),
            total_decisions: decisions.len(),
            decision_types,
            risk_distribution,
            average_confidence: average,
            min_confidence: min,
            max_confidence: max,
            human_oversight_rate,
            explanation_coverage,
            escalation_rate,
            recommendations,
        })
    }

    fn record(&self, system_id: &str) -> Result<&OversightRecord, AppError> {
        self.registered_systems.get(system_id).ok_or_else(|| {
            AppError::NotFound(format!("System {} not registered for oversight", system_id))
        })
    }

    fn log_audit_event(&mut self, system_id: &str, event_type: &str, event_data: Value) {
        let trail = self.audit_trails.entry(system_id.to_string()).or_default();
        trail.push(AuditEvent {
            event_id: Uuid::new_v4(),
            system_id: system_id.to_string(),
            timestamp: Utc::now(),
            event_type: event_type.to_string(),
            event_data,
        });
        if trail.len() > AUDIT_RETENTION {
            let excess = trail.len() - AUDIT_RETENTION;
            trail.drain(..excess);
        }
    }

    fn determine_oversight_level(profile: &SystemProfile) -> OversightLevel {
        if profile.use_case_matches(&["credit", "compliance", "fraud", "regulatory"]) {
            return OversightLevel::Comprehensive;
        }
        if !profile.regulatory_scope.is_empty() {
            return OversightLevel::Comprehensive;
        }
        if !profile.risk_factors.is_empty() {
            return OversightLevel::Enhanced;
        }
        OversightLevel::Basic
    }

    fn determine_decision_type(profile: &SystemProfile) -> DecisionType {
        if profile.use_case_matches(&["credit_approval", "compliance_violation"]) {
            return DecisionType::HumanApproval;
        }
        if profile.use_case_matches(&["high_risk"]) {
            return DecisionType::HumanInLoop;
        }
        DecisionType::Automated
    }

    fn oversight_requirements(level: OversightLevel) -> Vec<String> {
        let mut requirements = vec![
            "decision_logging".to_string(),
            "basic_monitoring".to_string(),
            "audit_trail".to_string(),
        ];

        if matches!(level, OversightLevel::Enhanced | OversightLevel::Comprehensive) {
            requirements.extend([
                "detailed_explanations".to_string(),
                "performance_monitoring".to_string(),
                "bias_monitoring".to_string(),
            ]);
        }

        if level == OversightLevel::Comprehensive {
            requirements.extend([
                "real_time_monitoring".to_string(),
                "human_oversight".to_string(),
                "regulatory_reporting".to_string(),
                "escalation_procedures".to_string(),
            ]);
        }

        requirements
    }

    fn monitoring_config(level: OversightLevel) -> MonitoringConfig {
        let mut config = MonitoringConfig {
            frequency: "daily".to_string(),
            metrics: vec![
                "accuracy".to_string(),
                "throughput".to_string(),
                "response_time".to_string(),
            ],
            alerts: vec![
                "performance_degradation".to_string(),
                "high_error_rate".to_string(),
            ],
        };

        if matches!(level, OversightLevel::Enhanced | OversightLevel::Comprehensive) {
            config.frequency = "hourly".to_string();
            config.metrics.extend([
                "bias_metrics".to_string(),
                "fairness_indicators".to_string(),
            ]);
            config.alerts.extend([
                "bias_alert".to_string(),
                "fairness_violation".to_string(),
            ]);
        }

        if level == OversightLevel::Comprehensive {
            config.frequency = "real_time".to_string();
            config.alerts.extend([
                "regulatory_threshold_breach".to_string(),
                "compliance_violation".to_string(),
            ]);
        }

        config
    }

    fn escalation_rules(level: OversightLevel) -> Vec<EscalationRule> {
        let mut rules = vec![
            EscalationRule {
                condition: EscalationCondition::LowConfidence {
                    threshold: ESCALATION_CONFIDENCE_THRESHOLD,
                },
                action: "flag_for_review".to_string(),
                severity: "medium".to_string(),
            },
            EscalationRule {
                condition: EscalationCondition::HighErrorRate { threshold: 0.1 },
                action: "immediate_review".to_string(),
                severity: "high".to_string(),
            },
        ];

        if level == OversightLevel::Comprehensive {
            rules.extend([
                EscalationRule {
                    condition: EscalationCondition::HighBias { threshold: 0.2 },
                    action: "suspend_system".to_string(),
                    severity: "critical".to_string(),
                },
                EscalationRule {
                    condition: EscalationCondition::RegulatoryBreach,
                    action: "immediate_escalation".to_string(),
                    severity: "critical".to_string(),
                },
            ]);
        }

        rules
    }

    fn monitoring_compliance(level: OversightLevel) -> f64 {
        match level {
            OversightLevel::Basic => 80.0,
            OversightLevel::Enhanced => 70.0,
            OversightLevel::Comprehensive => 60.0,
        }
    }

    fn audit_compliance(&self, system_id: &str) -> f64 {
        let events = match self.audit_trails.get(system_id) {
            Some(e) if !e.is_empty() => e,
            _ => return 0.0,
        };

        let cutoff = Utc::now() - Duration::days(7);
        if events.iter().any(|e| e.timestamp > cutoff) {
            90.0
        } else {
            40.0
        }
    }

    fn transparency_compliance(&self, system_id: &str) -> f64 {
        let decisions = match self.decision_logs.get(system_id) {
            Some(d) if !d.is_empty() => d,
            _ => return 0.0,
        };

        let explained = decisions.iter().filter(|d| !d.explanation.is_empty()).count();
        explained as f64 / decisions.len() as f64 * 100.0
    }

    fn recommendations(&self, system_id: &str, score: f64) -> Vec<String> {
        let mut recommendations = Vec::new();

        if score < 70.0 {
            recommendations.push("Improve oversight compliance - score below threshold".to_string());
        }
        if score < 50.0 {
            recommendations.push("Immediate oversight review required".to_string());
        }
        if self.decision_logs.get(system_id).map_or(true, |d| d.is_empty()) {
            recommendations.push("Implement decision logging".to_string());
        }

        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(use_case: &str) -> SystemProfile {
        SystemProfile {
            system_id: "sys-1".to_string(),
            name: "Test System".to_string(),
            description: String::new(),
            use_case: use_case.to_string(),
            model_type: String::new(),
            data_sources: vec![],
            data_types: vec![],
            data_sensitivity: Default::default(),
            risk_factors: vec![],
            jurisdictions: vec![],
            cloud_provider: String::new(),
            industry_sector: String::new(),
            regulatory_scope: vec![],
            quality_critical: false,
        }
    }

    #[test]
    fn test_oversight_level_determination() {
        assert_eq!(
            OversightManager::determine_oversight_level(&profile("credit_scoring")),
            OversightLevel::Comprehensive
        );

        let mut regulated = profile("chatbot");
        regulated.regulatory_scope = vec!["sr_11_7".to_string()];
        assert_eq!(
            OversightManager::determine_oversight_level(&regulated),
            OversightLevel::Comprehensive
        );

        let mut risky = profile("chatbot");
        risky.risk_factors = vec!["automated_decisions".to_string()];
        assert_eq!(
            OversightManager::determine_oversight_level(&risky),
            OversightLevel::Enhanced
        );

        assert_eq!(
            OversightManager::determine_oversight_level(&profile("chatbot")),
            OversightLevel::Basic
        );
    }

    #[test]
    fn test_registration_logs_audit_event() {
        let mut manager = OversightManager::new();
        manager.register_system(&profile("chatbot"));

        let trail = manager.get_audit_trail("sys-1", None, 100).unwrap();
        assert_eq!(trail.total_events, 1);
        assert_eq!(trail.events[0].event_type, "system_registered");
    }

    #[test]
    fn test_low_confidence_decision_escalates() {
        let mut manager = OversightManager::new();
        manager.register_system(&profile("chatbot"));

        manager
            .log_decision(
                "sys-1",
                DecisionSubmission {
                    confidence: Some(0.5),
                    ..Default::default()
                },
            )
            .unwrap();

        let trail = manager
            .get_audit_trail("sys-1", Some("decision_escalated"), 100)
            .unwrap();
        assert_eq!(trail.filtered_events, 1);
    }

    #[test]
    fn test_confident_decision_does_not_escalate() {
        let mut manager = OversightManager::new();
        manager.register_system(&profile("chatbot"));

        manager
            .log_decision(
                "sys-1",
                DecisionSubmission {
                    confidence: Some(0.95),
                    ..Default::default()
                },
            )
            .unwrap();

        let trail = manager
            .get_audit_trail("sys-1", Some("decision_escalated"), 100)
            .unwrap();
        assert_eq!(trail.filtered_events, 0);
    }

    #[test]
    fn test_transparency_report_coverage() {
        let mut manager = OversightManager::new();
        manager.register_system(&profile("chatbot"));

        manager
            .log_decision(
                "sys-1",
                DecisionSubmission {
                    explanation: "score below cutoff".to_string(),
                    human_reviewer: Some("analyst".to_string()),
                    confidence: Some(0.9),
                    ..Default::default()
                },
            )
            .unwrap();
        manager
            .log_decision("sys-1", DecisionSubmission::default())
            .unwrap();

        let report = manager
            .generate_transparency_report("sys-1", None, None)
            .unwrap();
        assert_eq!(report.total_decisions, 2);
        assert_eq!(report.explanation_coverage, 50.0);
        assert_eq!(report.human_oversight_rate, 50.0);
        assert_eq!(report.average_confidence, Some(0.9));
    }

    #[test]
    fn test_transparency_report_without_decisions_errors() {
        let mut manager = OversightManager::new();
        manager.register_system(&profile("chatbot"));

        assert!(manager
            .generate_transparency_report("sys-1", None, None)
            .is_err());
    }

    #[test]
    fn test_assessment_weights() {
        let mut manager = OversightManager::new();
        manager.register_system(&profile("chatbot"));

        // Basic level: monitoring 80, audit 90 (registration event is recent),
        // transparency 0 (no decisions), escalation 85
        let assessment = manager.assess_oversight_compliance("sys-1").unwrap();
        let expected = 80.0 * 0.3 + 90.0 * 0.25 + 0.0 * 0.25 + 85.0 * 0.2;
        assert!((assessment.score - expected).abs() < 1e-9);
    }
}
