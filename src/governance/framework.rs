//! Governance Framework
//!
//! Aggregates the five governance domains: registers AI systems with each
//! manager, computes the weighted overall compliance score and serves the
//! governance dashboard.

use crate::error::AppError;
use crate::governance::data_governance::{
    DataGovernanceAssessment, DataGovernanceManager, DataInventory, LineageSubmission,
    PrivacyCheck, PrivacySubmission, QualityDimensions, QualityReport,
};
use crate::governance::data_residency::{
    DataResidencyManager, LocationSubmission, ResidencyAssessment, ResidencyPolicy,
    ResidencyReport, ResidencyViolation, TransferValidation,
};
use crate::governance::iso_compliance::{
    ComplianceMaturity, GapAnalysis, IsoAssessment, IsoComplianceManager, IsoReport, IsoStandard,
    ProgressSubmission,
};
use crate::governance::model_risk::{
    ModelReport, ModelRiskAssessment, ModelRiskManager, PerformanceMetrics, ValidationOutcome,
    ValidationSubmission,
};
use crate::governance::oversight::{
    AuditTrail, DecisionSubmission, OversightAssessment, OversightManager, TransparencyReport,
};
use crate::governance::types::{DataSensitivity, GovernanceLevel, RiskLevel, SystemProfile};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// Weights applied to the five domain scores when computing the overall
/// compliance score
const MODULE_WEIGHTS: [(&str, f64); 5] = [
    ("model_risk", 0.25),
    ("ai_oversight", 0.20),
    ("data_governance", 0.20),
    ("data_residency", 0.15),
    ("iso_compliance", 0.20),
];

/// Governance record for a registered AI system
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceRecord {
    pub system_id: String,
    pub profile: SystemProfile,
    pub governance_level: GovernanceLevel,
    pub registered_at: DateTime<Utc>,
    pub governance_requirements: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance_status: Option<ComplianceStatus>,
}

/// The five domain assessments produced by one compliance run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleAssessments {
    pub model_risk: ModelRiskAssessment,
    pub ai_oversight: OversightAssessment,
    pub data_governance: DataGovernanceAssessment,
    pub data_residency: ResidencyAssessment,
    pub iso_compliance: IsoAssessment,
}

impl ModuleAssessments {
    fn score(&self, module: &str) -> f64 {
        match module {
            "model_risk" => self.model_risk.score,
            "ai_oversight" => self.ai_oversight.score,
            "data_governance" => self.data_governance.score,
            "data_residency" => self.data_residency.score,
            "iso_compliance" => self.iso_compliance.score,
            _ => 0.0,
        }
    }
}

/// Latest compliance standing of a system
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceStatus {
    pub last_assessed: DateTime<Utc>,
    pub overall_score: f64,
    pub status: String,
    pub module_assessments: ModuleAssessments,
}

/// Registration response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResult {
    pub system_id: String,
    pub governance_level: GovernanceLevel,
    pub requirements: Vec<String>,
}

/// One row in the dashboard's recent-assessment list
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentAssessment {
    pub system_id: String,
    pub score: f64,
    pub status: String,
    pub assessed_at: DateTime<Utc>,
}

/// Governance dashboard projection
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceDashboard {
    pub total_systems: usize,
    pub compliant_systems: usize,
    pub compliance_rate: f64,
    pub governance_levels: HashMap<String, usize>,
    pub recent_assessments: Vec<RecentAssessment>,
}

/// The synchronous framework core; all access goes through
/// [`GovernanceService`] which serializes it behind one lock
pub struct GovernanceFramework {
    compliance_threshold: f64,
    registered_systems: HashMap<String, GovernanceRecord>,
    pub model_risk: ModelRiskManager,
    pub oversight: OversightManager,
    pub data_governance: DataGovernanceManager,
    pub data_residency: DataResidencyManager,
    pub iso_compliance: IsoComplianceManager,
}

impl GovernanceFramework {
    pub fn new(compliance_threshold: f64) -> Self {
        Self {
            compliance_threshold,
            registered_systems: HashMap::new(),
            model_risk: ModelRiskManager::new(),
            oversight: OversightManager::new(),
            data_governance: DataGovernanceManager::new(),
            data_residency: DataResidencyManager::new(),
            iso_compliance: IsoComplianceManager::new(),
        }
    }

    /// Register a new AI system for governance
    pub fn register_ai_system(&mut self, profile: SystemProfile) -> RegistrationResult {
        let governance_level = Self::assess_governance_level(&profile);
        let record = GovernanceRecord {
            system_id: profile.system_id.clone(),
            governance_level,
            registered_at: Utc::now(),
            governance_requirements: Self::governance_requirements(governance_level),
            compliance_status: None,
            profile: profile.clone(),
        };

        // Fan out registration to every governance domain
        self.model_risk.register_system(&profile);
        self.oversight.register_system(&profile);
        self.data_governance.register_system(&profile);
        self.data_residency.register_system(&profile);
        self.iso_compliance
            .register_system(&profile, Self::risk_level_for(governance_level));

        info!(
            system_id = %profile.system_id,
            governance_level = governance_level.as_str(),
            "AI system registered for governance"
        );

        let result = RegistrationResult {
            system_id: record.system_id.clone(),
            governance_level,
            requirements: record.governance_requirements.clone(),
        };
        self.registered_systems
            .insert(profile.system_id.clone(), record);
        result
    }

    /// Comprehensive compliance assessment for a registered AI system
    pub fn assess_system_compliance(
        &mut self,
        system_id: &str,
    ) -> Result<ComplianceStatus, AppError> {
        if !self.registered_systems.contains_key(system_id) {
            return Err(AppError::NotFound(format!(
                "System {} not registered",
                system_id
            )));
        }

        let assessments = ModuleAssessments {
            model_risk: self.model_risk.assess_model_risk(system_id)?,
            ai_oversight: self.oversight.assess_oversight_compliance(system_id)?,
            data_governance: self.data_governance.assess_data_compliance(system_id)?,
            data_residency: self.data_residency.assess_residency_compliance(system_id)?,
            iso_compliance: self.iso_compliance.assess_iso_compliance(system_id)?,
        };

        let overall_score = Self::overall_compliance(&assessments);
        let status = ComplianceStatus {
            last_assessed: Utc::now(),
            overall_score,
            status: if overall_score >= self.compliance_threshold {
                "compliant".to_string()
            } else {
                "non_compliant".to_string()
            },
            module_assessments: assessments,
        };

        info!(
            system_id,
            overall_score, status = %status.status, "compliance assessment complete"
        );

        if let Some(record) = self.registered_systems.get_mut(system_id) {
            record.compliance_status = Some(status.clone());
        }

        Ok(status)
    }

    /// Fetch a registered system
    pub fn get_system(&self, system_id: &str) -> Result<&GovernanceRecord, AppError> {
        self.registered_systems
            .get(system_id)
            .ok_or_else(|| AppError::NotFound(format!("System {} not registered", system_id)))
    }

    /// All registered systems, most recently registered first
    pub fn list_systems(&self) -> Vec<&GovernanceRecord> {
        let mut systems: Vec<&GovernanceRecord> = self.registered_systems.values().collect();
        systems.sort_by(|a, b| b.registered_at.cmp(&a.registered_at));
        systems
    }

    /// Generate governance dashboard data
    pub fn get_governance_dashboard(&self) -> GovernanceDashboard {
        let total = self.registered_systems.len();
        let compliant = self
            .registered_systems
            .values()
            .filter(|s| {
                s.compliance_status
                    .as_ref()
                    .map_or(false, |c| c.status == "compliant")
            })
            .count();

        let mut governance_levels: HashMap<String, usize> = HashMap::new();
        for record in self.registered_systems.values() {
            *governance_levels
                .entry(record.governance_level.as_str().to_string())
                .or_insert(0) += 1;
        }

        let mut recent: Vec<RecentAssessment> = self
            .registered_systems
            .values()
            .filter_map(|record| {
                record.compliance_status.as_ref().map(|c| RecentAssessment {
                    system_id: record.system_id.clone(),
                    score: c.overall_score,
                    status: c.status.clone(),
                    assessed_at: c.last_assessed,
                })
            })
            .collect();
        recent.sort_by(|a, b| b.assessed_at.cmp(&a.assessed_at));
        recent.truncate(10);

        GovernanceDashboard {
            total_systems: total,
            compliant_systems: compliant,
            compliance_rate: if total > 0 {
                compliant as f64 / total as f64 * 100.0
            } else {
                0.0
            },
            governance_levels,
            recent_assessments: recent,
        }
    }

    /// Score the governance level required for a system
    fn assess_governance_level(profile: &SystemProfile) -> GovernanceLevel {
        let mut score = 0usize;

        if profile.use_case_matches(&[
            "credit_scoring",
            "fraud_detection",
            "compliance",
            "regulatory",
        ]) {
            score += 3;
        }

        match profile.data_sensitivity {
            DataSensitivity::High => score += 2,
            DataSensitivity::Medium => score += 1,
            DataSensitivity::Low => {}
        }

        score += profile.risk_factors.len();

        match score {
            s if s >= 5 => GovernanceLevel::Critical,
            s if s >= 3 => GovernanceLevel::High,
            s if s >= 1 => GovernanceLevel::Medium,
            _ => GovernanceLevel::Low,
        }
    }

    fn risk_level_for(level: GovernanceLevel) -> RiskLevel {
        match level {
            GovernanceLevel::Low => RiskLevel::Low,
            GovernanceLevel::Medium => RiskLevel::Medium,
            GovernanceLevel::High => RiskLevel::High,
            GovernanceLevel::Critical => RiskLevel::Critical,
        }
    }

    fn governance_requirements(level: GovernanceLevel) -> Vec<String> {
        let mut requirements = vec![
            "Model documentation".to_string(),
            "Data lineage tracking".to_string(),
            "Basic monitoring".to_string(),
        ];

        if matches!(
            level,
            GovernanceLevel::Medium | GovernanceLevel::High | GovernanceLevel::Critical
        ) {
            requirements.extend([
                "Model validation".to_string(),
                "Bias testing".to_string(),
                "Performance monitoring".to_string(),
            ]);
        }

        if matches!(level, GovernanceLevel::High | GovernanceLevel::Critical) {
            requirements.extend([
                "Third-party model validation".to_string(),
                "Explainability analysis".to_string(),
                "Regulatory compliance review".to_string(),
            ]);
        }

        if level == GovernanceLevel::Critical {
            requirements.extend([
                "Board-level oversight".to_string(),
                "Continuous monitoring".to_string(),
                "Incident response plan".to_string(),
            ]);
        }

        requirements
    }

    fn overall_compliance(assessments: &ModuleAssessments) -> f64 {
        let mut weighted = 0.0;
        let mut total_weight = 0.0;
        for (module, weight) in MODULE_WEIGHTS {
            weighted += assessments.score(module) * weight;
            total_weight += weight;
        }
        if total_weight > 0.0 {
            weighted / total_weight
        } else {
            0.0
        }
    }
}

/// Thread-safe governance service shared across handlers.
/// One lock serializes all framework access.
pub struct GovernanceService {
    inner: RwLock<GovernanceFramework>,
}

impl GovernanceService {
    pub fn new(compliance_threshold: f64) -> Self {
        Self {
            inner: RwLock::new(GovernanceFramework::new(compliance_threshold)),
        }
    }

    pub async fn register_ai_system(&self, profile: SystemProfile) -> RegistrationResult {
        self.inner.write().await.register_ai_system(profile)
    }

    pub async fn assess_system_compliance(
        &self,
        system_id: &str,
    ) -> Result<ComplianceStatus, AppError> {
        self.inner.write().await.assess_system_compliance(system_id)
    }

    pub async fn get_system(&self, system_id: &str) -> Result<GovernanceRecord, AppError> {
        self.inner.read().await.get_system(system_id).cloned()
    }

    pub async fn list_systems(&self) -> Vec<GovernanceRecord> {
        self.inner
            .read()
            .await
            .list_systems()
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn get_governance_dashboard(&self) -> GovernanceDashboard {
        self.inner.read().await.get_governance_dashboard()
    }

    pub async fn validate_model(
        &self,
        system_id: &str,
        submission: ValidationSubmission,
    ) -> Result<ValidationOutcome, AppError> {
        self.inner
            .write()
            .await
            .model_risk
            .validate_model(system_id, submission)
    }

    pub async fn get_model_report(&self, system_id: &str) -> Result<ModelReport, AppError> {
        self.inner.read().await.model_risk.get_model_report(system_id)
    }

    pub async fn log_performance_metrics(
        &self,
        system_id: &str,
        metrics: PerformanceMetrics,
    ) -> Result<Vec<String>, AppError> {
        self.inner
            .write()
            .await
            .model_risk
            .log_performance_metrics(system_id, metrics)
    }

    pub async fn log_decision(
        &self,
        system_id: &str,
        submission: DecisionSubmission,
    ) -> Result<Uuid, AppError> {
        self.inner
            .write()
            .await
            .oversight
            .log_decision(system_id, submission)
    }

    pub async fn get_audit_trail(
        &self,
        system_id: &str,
        event_type: Option<&str>,
        limit: usize,
    ) -> Result<AuditTrail, AppError> {
        self.inner
            .read()
            .await
            .oversight
            .get_audit_trail(system_id, event_type, limit)
    }

    pub async fn generate_transparency_report(
        &self,
        system_id: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<TransparencyReport, AppError> {
        self.inner
            .read()
            .await
            .oversight
            .generate_transparency_report(system_id, start, end)
    }

    pub async fn assess_data_quality(
        &self,
        system_id: &str,
        data_source: &str,
        dimensions: QualityDimensions,
    ) -> Result<QualityReport, AppError> {
        self.inner
            .write()
            .await
            .data_governance
            .assess_data_quality(system_id, data_source, dimensions)
    }

    pub async fn track_data_lineage(
        &self,
        system_id: &str,
        submission: LineageSubmission,
    ) -> Result<(), AppError> {
        self.inner
            .write()
            .await
            .data_governance
            .track_data_lineage(system_id, submission)
            .map(|_| ())
    }

    pub async fn check_privacy_compliance(
        &self,
        system_id: &str,
        submission: PrivacySubmission,
    ) -> Result<PrivacyCheck, AppError> {
        self.inner
            .write()
            .await
            .data_governance
            .check_privacy_compliance(system_id, submission)
    }

    pub async fn generate_data_inventory(
        &self,
        system_id: Option<&str>,
    ) -> Result<DataInventory, AppError> {
        self.inner
            .read()
            .await
            .data_governance
            .generate_data_inventory(system_id)
    }

    pub async fn track_data_location(
        &self,
        system_id: &str,
        submission: LocationSubmission,
    ) -> Result<Vec<ResidencyViolation>, AppError> {
        self.inner
            .write()
            .await
            .data_residency
            .track_data_location(system_id, submission)
    }

    pub async fn update_residency_policy(&self, policy: ResidencyPolicy) -> String {
        self.inner
            .write()
            .await
            .data_residency
            .update_residency_policy(policy)
    }

    pub async fn validate_data_transfer(
        &self,
        from_region: &str,
        to_region: &str,
        data_types: &[String],
    ) -> TransferValidation {
        self.inner
            .read()
            .await
            .data_residency
            .validate_data_transfer(from_region, to_region, data_types)
    }

    pub async fn get_residency_report(
        &self,
        system_id: Option<&str>,
    ) -> Result<ResidencyReport, AppError> {
        self.inner
            .read()
            .await
            .data_residency
            .get_residency_report(system_id)
    }

    pub async fn conduct_gap_analysis(
        &self,
        system_id: &str,
        standard: IsoStandard,
    ) -> Result<GapAnalysis, AppError> {
        self.inner
            .read()
            .await
            .iso_compliance
            .conduct_gap_analysis(system_id, standard)
    }

    pub async fn track_compliance_progress(
        &self,
        system_id: &str,
        progress: ProgressSubmission,
    ) -> Result<ComplianceMaturity, AppError> {
        self.inner
            .write()
            .await
            .iso_compliance
            .track_compliance_progress(system_id, progress)
    }

    pub async fn generate_iso_report(&self) -> IsoReport {
        self.inner.read().await.iso_compliance.generate_compliance_report()
    }
}
