//! Data Governance
//!
//! Data quality monitoring, lineage tracking, privacy compliance and
//! inventory reporting for the data behind registered AI systems.

use crate::error::AppError;
use crate::governance::types::SystemProfile;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Quality reports older than this no longer count as current
const QUALITY_STALE_DAYS: i64 = 30;
/// Lineage records older than this are considered outdated
const LINEAGE_STALE_DAYS: i64 = 60;

/// Data classification levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataClassification {
    Public,
    Internal,
    Confidential,
    Restricted,
}

impl DataClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataClassification::Public => "public",
            DataClassification::Internal => "internal",
            DataClassification::Confidential => "confidential",
            DataClassification::Restricted => "restricted",
        }
    }
}

/// Data quality status levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataQualityStatus {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl DataQualityStatus {
    fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            DataQualityStatus::Excellent
        } else if score >= 75.0 {
            DataQualityStatus::Good
        } else if score >= 50.0 {
            DataQualityStatus::Fair
        } else {
            DataQualityStatus::Poor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataQualityStatus::Excellent => "excellent",
            DataQualityStatus::Good => "good",
            DataQualityStatus::Fair => "fair",
            DataQualityStatus::Poor => "poor",
        }
    }
}

/// The six measured quality dimensions, each 0-100
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityDimensions {
    #[serde(default)]
    pub completeness: f64,
    #[serde(default)]
    pub accuracy: f64,
    #[serde(default)]
    pub consistency: f64,
    #[serde(default)]
    pub timeliness: f64,
    #[serde(default)]
    pub validity: f64,
    #[serde(default)]
    pub uniqueness: f64,
}

impl QualityDimensions {
    fn mean(&self) -> f64 {
        (self.completeness
            + self.accuracy
            + self.consistency
            + self.timeliness
            + self.validity
            + self.uniqueness)
            / 6.0
    }
}

/// A tracked data asset (one per registered data source)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataAsset {
    pub asset_id: String,
    pub system_id: String,
    pub source_name: String,
    pub classification: DataClassification,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_quality_check: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_status: Option<DataQualityStatus>,
}

/// A data quality assessment report
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    pub report_id: Uuid,
    pub system_id: String,
    pub data_source: String,
    pub assessed_at: DateTime<Utc>,
    pub quality_score: f64,
    pub quality_status: DataQualityStatus,
    pub dimensions: QualityDimensions,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Submitted lineage information
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageSubmission {
    #[serde(default)]
    pub data_flow: Vec<DataFlowEdge>,
    #[serde(default)]
    pub transformations: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<LineageDependency>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFlowEdge {
    pub source_system: String,
    pub target_system: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageDependency {
    pub name: String,
    #[serde(default)]
    pub criticality: String,
}

/// Recorded lineage with derived impact analysis
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageRecord {
    pub system_id: String,
    pub tracked_at: DateTime<Utc>,
    pub data_flow: Vec<DataFlowEdge>,
    pub transformations: Vec<String>,
    pub dependencies: Vec<LineageDependency>,
    pub upstream_systems: usize,
    pub downstream_systems: usize,
    pub critical_dependencies: usize,
    pub impact_score: usize,
}

/// Submitted privacy posture flags
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacySubmission {
    #[serde(default)]
    pub lawful_basis: bool,
    #[serde(default)]
    pub data_subject_rights: bool,
    #[serde(default)]
    pub privacy_by_design: bool,
    #[serde(default)]
    pub data_protection_officer: bool,
    #[serde(default)]
    pub breach_notification: bool,
    #[serde(default)]
    pub consumer_rights: bool,
    #[serde(default)]
    pub opt_out_mechanism: bool,
    #[serde(default)]
    pub privacy_notice: bool,
    #[serde(default)]
    pub data_sale_disclosure: bool,
    #[serde(default)]
    pub data_minimization: bool,
    #[serde(default)]
    pub consent_management: bool,
}

/// Per-regulation compliance result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegulationCheck {
    pub score: f64,
    pub requirements_met: Vec<String>,
    pub requirements_missing: Vec<String>,
}

/// Result of a privacy compliance check
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivacyCheck {
    pub system_id: String,
    pub checked_at: DateTime<Utc>,
    pub data_classification: DataClassification,
    pub gdpr: RegulationCheck,
    pub ccpa: RegulationCheck,
    pub data_minimization_score: f64,
    pub consent_management_score: f64,
    pub overall_score: f64,
}

/// Data governance compliance assessment
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataGovernanceAssessment {
    pub system_id: String,
    pub assessed_at: DateTime<Utc>,
    pub data_classification: DataClassification,
    pub score: f64,
    pub quality_compliance: f64,
    pub lineage_compliance: f64,
    pub privacy_compliance: f64,
    pub retention_compliance: f64,
    pub data_assets_count: usize,
    pub recommendations: Vec<String>,
    pub next_review_date: DateTime<Utc>,
}

/// Data inventory report
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataInventory {
    pub generated_at: DateTime<Utc>,
    pub scope: String,
    pub total_assets: usize,
    pub classification_breakdown: HashMap<String, usize>,
    pub quality_breakdown: HashMap<String, usize>,
    pub assets: Vec<DataAsset>,
}

/// Registration record for a system under data governance
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataGovernanceRecord {
    pub system_id: String,
    pub system_name: String,
    pub data_sources: Vec<String>,
    pub data_types: Vec<String>,
    pub data_classification: DataClassification,
    pub registered_at: DateTime<Utc>,
    pub governance_requirements: Vec<String>,
    pub privacy_requirements: Vec<String>,
    pub retention_period: String,
    pub anonymization_required: bool,
}

/// Manages data governance including quality, lineage, and compliance
#[derive(Default)]
pub struct DataGovernanceManager {
    registered_systems: HashMap<String, DataGovernanceRecord>,
    data_assets: HashMap<String, DataAsset>,
    quality_reports: HashMap<String, Vec<QualityReport>>,
    lineage_records: HashMap<String, LineageRecord>,
    privacy_checks: HashMap<String, Vec<PrivacyCheck>>,
}

impl DataGovernanceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a system for data governance
    pub fn register_system(&mut self, profile: &SystemProfile) {
        let classification = Self::classify_data(profile);
        let record = DataGovernanceRecord {
            system_id: profile.system_id.clone(),
            system_name: profile.name.clone(),
            data_sources: profile.data_sources.clone(),
            data_types: profile.data_types.clone(),
            data_classification: classification,
            registered_at: Utc::now(),
            governance_requirements: Self::governance_requirements(classification),
            privacy_requirements: Self::privacy_requirements(profile),
            retention_period: Self::retention_period(profile),
            anonymization_required: profile.has_data_type(&["pii"]),
        };

        for source in &record.data_sources {
            let asset_id = format!("{}_{}", profile.system_id, source);
            self.data_assets.insert(
                asset_id.clone(),
                DataAsset {
                    asset_id,
                    system_id: profile.system_id.clone(),
                    source_name: source.clone(),
                    classification,
                    created_at: Utc::now(),
                    last_quality_check: None,
                    quality_score: None,
                    quality_status: None,
                },
            );
        }

        self.quality_reports
            .insert(profile.system_id.clone(), Vec::new());
        self.privacy_checks
            .insert(profile.system_id.clone(), Vec::new());
        self.registered_systems
            .insert(profile.system_id.clone(), record);
    }

    /// Assess data governance compliance for a registered system
    pub fn assess_data_compliance(
        &self,
        system_id: &str,
    ) -> Result<DataGovernanceAssessment, AppError> {
        let record = self.record(system_id)?;

        let quality = self.quality_compliance(system_id);
        let lineage = self.lineage_compliance(system_id);
        let privacy = self.privacy_compliance(system_id);
        let retention = 85.0; // retention policy is always assigned at registration

        let score = quality * 0.3 + lineage * 0.25 + privacy * 0.25 + retention * 0.2;

        Ok(DataGovernanceAssessment {
            system_id: system_id.to_string(),
            assessed_at: Utc::now(),
            data_classification: record.data_classification,
            score,
            quality_compliance: quality,
            lineage_compliance: lineage,
            privacy_compliance: privacy,
            retention_compliance: retention,
            data_assets_count: self
                .data_assets
                .values()
                .filter(|a| a.system_id == system_id)
                .count(),
            recommendations: self.recommendations(system_id, score),
            next_review_date: Utc::now() + Duration::days(60),
        })
    }

    /// Assess data quality for a specific data source
    pub fn assess_data_quality(
        &mut self,
        system_id: &str,
        data_source: &str,
        dimensions: QualityDimensions,
    ) -> Result<QualityReport, AppError> {
        self.record(system_id)?;

        let score = dimensions.mean();
        let status = DataQualityStatus::from_score(score);

        let report = QualityReport {
            report_id: Uuid::new_v4(),
            system_id: system_id.to_string(),
            data_source: data_source.to_string(),
            assessed_at: Utc::now(),
            quality_score: score,
            quality_status: status,
            dimensions,
            issues: Self::quality_issues(&dimensions),
            recommendations: Self::quality_recommendations(&dimensions),
        };

        let asset_id = format!("{}_{}", system_id, data_source);
        if let Some(asset) = self.data_assets.get_mut(&asset_id) {
            asset.last_quality_check = Some(report.assessed_at);
            asset.quality_score = Some(score);
            asset.quality_status = Some(status);
        }

        self.quality_reports
            .entry(system_id.to_string())
            .or_default()
            .push(report.clone());

        Ok(report)
    }

    /// Track data lineage for a system
    pub fn track_data_lineage(
        &mut self,
        system_id: &str,
        submission: LineageSubmission,
    ) -> Result<&LineageRecord, AppError> {
        self.record(system_id)?;

        let upstream: std::collections::HashSet<&str> = submission
            .data_flow
            .iter()
            .map(|e| e.source_system.as_str())
            .collect();
        let downstream: std::collections::HashSet<&str> = submission
            .data_flow
            .iter()
            .map(|e| e.target_system.as_str())
            .collect();
        let critical = submission
            .dependencies
            .iter()
            .filter(|d| d.criticality == "high")
            .count();

        let record = LineageRecord {
            system_id: system_id.to_string(),
            tracked_at: Utc::now(),
            upstream_systems: upstream.len(),
            downstream_systems: downstream.len(),
            critical_dependencies: critical,
            impact_score: submission.dependencies.len() * 10,
            data_flow: submission.data_flow,
            transformations: submission.transformations,
            dependencies: submission.dependencies,
        };

        self.lineage_records.insert(system_id.to_string(), record);
        Ok(&self.lineage_records[system_id])
    }

    /// Check privacy compliance for a system
    pub fn check_privacy_compliance(
        &mut self,
        system_id: &str,
        submission: PrivacySubmission,
    ) -> Result<PrivacyCheck, AppError> {
        let record = self.record(system_id)?;

        let gdpr = Self::check_requirements(&[
            ("lawful_basis", submission.lawful_basis),
            ("data_subject_rights", submission.data_subject_rights),
            ("privacy_by_design", submission.privacy_by_design),
            ("data_protection_officer", submission.data_protection_officer),
            ("breach_notification", submission.breach_notification),
        ]);
        let ccpa = Self::check_requirements(&[
            ("consumer_rights", submission.consumer_rights),
            ("opt_out_mechanism", submission.opt_out_mechanism),
            ("privacy_notice", submission.privacy_notice),
            ("data_sale_disclosure", submission.data_sale_disclosure),
        ]);
        let minimization = if submission.data_minimization { 80.0 } else { 0.0 };
        let consent = if submission.consent_management { 75.0 } else { 0.0 };

        let overall = (gdpr.score + ccpa.score + minimization + consent) / 4.0;

        let check = PrivacyCheck {
            system_id: system_id.to_string(),
            checked_at: Utc::now(),
            data_classification: record.data_classification,
            gdpr,
            ccpa,
            data_minimization_score: minimization,
            consent_management_score: consent,
            overall_score: overall,
        };

        self.privacy_checks
            .entry(system_id.to_string())
            .or_default()
            .push(check.clone());

        Ok(check)
    }

    /// Generate data inventory report, optionally scoped to one system
    pub fn generate_data_inventory(
        &self,
        system_id: Option<&str>,
    ) -> Result<DataInventory, AppError> {
        if let Some(id) = system_id {
            self.record(id)?;
        }

        let assets: Vec<DataAsset> = self
            .data_assets
            .values()
            .filter(|a| system_id.map_or(true, |id| a.system_id == id))
            .cloned()
            .collect();

        let mut classification_breakdown: HashMap<String, usize> = HashMap::new();
        let mut quality_breakdown: HashMap<String, usize> = HashMap::new();
        for asset in &assets {
            *classification_breakdown
                .entry(asset.classification.as_str().to_string())
                .or_insert(0) += 1;
            let quality = asset
                .quality_status
                .map(|s| s.as_str().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            *quality_breakdown.entry(quality).or_insert(0) += 1;
        }

        Ok(DataInventory {
            generated_at: Utc::now(),
            scope: system_id
                .map(|id| format!("system_{}", id))
                .unwrap_or_else(|| "all_systems".to_string()),
            total_assets: assets.len(),
            classification_breakdown,
            quality_breakdown,
            assets,
        })
    }

    fn record(&self, system_id: &str) -> Result<&DataGovernanceRecord, AppError> {
        self.registered_systems.get(system_id).ok_or_else(|| {
            AppError::NotFound(format!(
                "System {} not registered for data governance",
                system_id
            ))
        })
    }

    /// Classify data from declared types and use case
    fn classify_data(profile: &SystemProfile) -> DataClassification {
        if profile.has_data_type(&["pii", "financial", "health", "biometric"]) {
            return DataClassification::Restricted;
        }
        if profile.use_case_matches(&["compliance", "regulatory", "credit"]) {
            return DataClassification::Confidential;
        }
        DataClassification::Internal
    }

    fn governance_requirements(classification: DataClassification) -> Vec<String> {
        let mut requirements = vec![
            "data_catalog".to_string(),
            "quality_monitoring".to_string(),
            "basic_lineage".to_string(),
        ];

        if matches!(
            classification,
            DataClassification::Confidential | DataClassification::Restricted
        ) {
            requirements.extend([
                "comprehensive_lineage".to_string(),
                "access_controls".to_string(),
                "audit_logging".to_string(),
            ]);
        }

        if classification == DataClassification::Restricted {
            requirements.extend([
                "encryption_at_rest".to_string(),
                "encryption_in_transit".to_string(),
                "privacy_compliance".to_string(),
                "data_masking".to_string(),
            ]);
        }

        requirements
    }

    fn privacy_requirements(profile: &SystemProfile) -> Vec<String> {
        let mut requirements = Vec::new();

        if profile.has_data_type(&["pii"]) {
            requirements.extend([
                "consent_management".to_string(),
                "data_subject_rights".to_string(),
                "purpose_limitation".to_string(),
            ]);
        }
        if profile.in_jurisdiction(&["eu"]) {
            requirements.extend([
                "gdpr_compliance".to_string(),
                "right_to_be_forgotten".to_string(),
            ]);
        }
        if profile.in_jurisdiction(&["california"]) {
            requirements.push("ccpa_compliance".to_string());
        }

        requirements
    }

    fn retention_period(profile: &SystemProfile) -> String {
        if profile.use_case_matches(&["compliance"]) {
            "10_years".to_string()
        } else if profile.use_case_matches(&["analytics"]) {
            "3_years".to_string()
        } else {
            "7_years".to_string()
        }
    }

    fn quality_issues(dimensions: &QualityDimensions) -> Vec<String> {
        let mut issues = Vec::new();
        if dimensions.completeness < 95.0 {
            issues.push("Data completeness below threshold".to_string());
        }
        if dimensions.accuracy < 90.0 {
            issues.push("Data accuracy concerns detected".to_string());
        }
        if dimensions.consistency < 85.0 {
            issues.push("Data consistency issues found".to_string());
        }
        if dimensions.timeliness < 80.0 {
            issues.push("Data timeliness issues detected".to_string());
        }
        issues
    }

    fn quality_recommendations(dimensions: &QualityDimensions) -> Vec<String> {
        let mut recommendations = Vec::new();
        if dimensions.completeness < 95.0 {
            recommendations
                .push("Implement data validation rules to improve completeness".to_string());
        }
        if dimensions.accuracy < 90.0 {
            recommendations
                .push("Review data entry processes and validation controls".to_string());
        }
        if dimensions.consistency < 85.0 {
            recommendations.push("Standardize data formats and reference data".to_string());
        }
        recommendations
    }

    fn quality_compliance(&self, system_id: &str) -> f64 {
        let reports = match self.quality_reports.get(system_id) {
            Some(r) if !r.is_empty() => r,
            _ => return 0.0,
        };

        let cutoff = Utc::now() - Duration::days(QUALITY_STALE_DAYS);
        let recent: Vec<_> = reports.iter().filter(|r| r.assessed_at > cutoff).collect();

        if recent.is_empty() {
            return 30.0;
        }

        recent.iter().map(|r| r.quality_score).sum::<f64>() / recent.len() as f64
    }

    fn lineage_compliance(&self, system_id: &str) -> f64 {
        let record = match self.lineage_records.get(system_id) {
            Some(r) => r,
            None => return 0.0,
        };

        if Utc::now() - record.tracked_at > Duration::days(LINEAGE_STALE_DAYS) {
            return 40.0;
        }

        let mut score = 0.0;
        if !record.data_flow.is_empty() {
            score += 40.0;
        }
        if !record.transformations.is_empty() {
            score += 30.0;
        }
        if !record.dependencies.is_empty() {
            score += 30.0;
        }
        score
    }

    fn privacy_compliance(&self, system_id: &str) -> f64 {
        self.privacy_checks
            .get(system_id)
            .and_then(|checks| checks.last())
            .map(|c| c.overall_score)
            .unwrap_or(0.0)
    }

    fn recommendations(&self, system_id: &str, score: f64) -> Vec<String> {
        let mut recommendations = Vec::new();

        if score < 70.0 {
            recommendations
                .push("Improve data governance compliance - score below threshold".to_string());
        }
        if self.quality_reports.get(system_id).map_or(true, |r| r.is_empty()) {
            recommendations.push("Implement data quality monitoring".to_string());
        }
        if !self.lineage_records.contains_key(system_id) {
            recommendations.push("Establish data lineage tracking".to_string());
        }
        if self.privacy_checks.get(system_id).map_or(true, |c| c.is_empty()) {
            recommendations.push("Conduct privacy compliance assessment".to_string());
        }

        recommendations
    }

    fn check_requirements(requirements: &[(&str, bool)]) -> RegulationCheck {
        let per_requirement = 100.0 / requirements.len() as f64;
        let mut met = Vec::new();
        let mut missing = Vec::new();

        for (name, satisfied) in requirements {
            if *satisfied {
                met.push(name.to_string());
            } else {
                missing.push(name.to_string());
            }
        }

        RegulationCheck {
            score: met.len() as f64 * per_requirement,
            requirements_met: met,
            requirements_missing: missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(data_types: Vec<&str>, use_case: &str) -> SystemProfile {
        SystemProfile {
            system_id: "sys-1".to_string(),
            name: "Test System".to_string(),
            description: String::new(),
            use_case: use_case.to_string(),
            model_type: String::new(),
            data_sources: vec!["warehouse".to_string(), "events".to_string()],
            data_types: data_types.into_iter().map(String::from).collect(),
            data_sensitivity: Default::default(),
            risk_factors: vec![],
            jurisdictions: vec!["EU".to_string()],
            cloud_provider: String::new(),
            industry_sector: String::new(),
            regulatory_scope: vec![],
            quality_critical: false,
        }
    }

    #[test]
    fn test_data_classification() {
        assert_eq!(
            DataGovernanceManager::classify_data(&profile(vec!["pii"], "analytics")),
            DataClassification::Restricted
        );
        assert_eq!(
            DataGovernanceManager::classify_data(&profile(vec!["logs"], "credit_scoring")),
            DataClassification::Confidential
        );
        assert_eq!(
            DataGovernanceManager::classify_data(&profile(vec!["logs"], "analytics")),
            DataClassification::Internal
        );
    }

    #[test]
    fn test_registration_creates_assets_per_source() {
        let mut manager = DataGovernanceManager::new();
        manager.register_system(&profile(vec!["pii"], "analytics"));

        let inventory = manager.generate_data_inventory(Some("sys-1")).unwrap();
        assert_eq!(inventory.total_assets, 2);
        assert_eq!(inventory.classification_breakdown["restricted"], 2);
    }

    #[test]
    fn test_quality_status_bands() {
        assert_eq!(
            DataQualityStatus::from_score(95.0),
            DataQualityStatus::Excellent
        );
        assert_eq!(DataQualityStatus::from_score(80.0), DataQualityStatus::Good);
        assert_eq!(DataQualityStatus::from_score(60.0), DataQualityStatus::Fair);
        assert_eq!(DataQualityStatus::from_score(20.0), DataQualityStatus::Poor);
    }

    #[test]
    fn test_quality_assessment_updates_asset() {
        let mut manager = DataGovernanceManager::new();
        manager.register_system(&profile(vec!["logs"], "analytics"));

        let dims = QualityDimensions {
            completeness: 98.0,
            accuracy: 96.0,
            consistency: 94.0,
            timeliness: 92.0,
            validity: 95.0,
            uniqueness: 97.0,
        };
        let report = manager
            .assess_data_quality("sys-1", "warehouse", dims)
            .unwrap();
        assert_eq!(report.quality_status, DataQualityStatus::Excellent);
        assert!(report.issues.is_empty());

        let asset = &manager.data_assets["sys-1_warehouse"];
        assert_eq!(asset.quality_status, Some(DataQualityStatus::Excellent));
    }

    #[test]
    fn test_low_quality_produces_issues() {
        let report_dims = QualityDimensions {
            completeness: 80.0,
            accuracy: 70.0,
            consistency: 60.0,
            timeliness: 50.0,
            validity: 90.0,
            uniqueness: 90.0,
        };
        let issues = DataGovernanceManager::quality_issues(&report_dims);
        assert_eq!(issues.len(), 4);
    }

    #[test]
    fn test_privacy_check_scoring() {
        let mut manager = DataGovernanceManager::new();
        manager.register_system(&profile(vec!["pii"], "analytics"));

        let check = manager
            .check_privacy_compliance(
                "sys-1",
                PrivacySubmission {
                    lawful_basis: true,
                    data_subject_rights: true,
                    privacy_by_design: true,
                    data_protection_officer: true,
                    breach_notification: true,
                    consumer_rights: true,
                    opt_out_mechanism: true,
                    privacy_notice: true,
                    data_sale_disclosure: true,
                    data_minimization: true,
                    consent_management: true,
                },
            )
            .unwrap();

        assert_eq!(check.gdpr.score, 100.0);
        assert_eq!(check.ccpa.score, 100.0);
        assert_eq!(check.overall_score, (100.0 + 100.0 + 80.0 + 75.0) / 4.0);
    }

    #[test]
    fn test_lineage_compliance_components() {
        let mut manager = DataGovernanceManager::new();
        manager.register_system(&profile(vec!["logs"], "analytics"));

        assert_eq!(manager.lineage_compliance("sys-1"), 0.0);

        manager
            .track_data_lineage(
                "sys-1",
                LineageSubmission {
                    data_flow: vec![DataFlowEdge {
                        source_system: "crm".to_string(),
                        target_system: "warehouse".to_string(),
                    }],
                    transformations: vec!["normalize".to_string()],
                    dependencies: vec![],
                },
            )
            .unwrap();

        assert_eq!(manager.lineage_compliance("sys-1"), 70.0);
    }

    #[test]
    fn test_assessment_weights() {
        let mut manager = DataGovernanceManager::new();
        manager.register_system(&profile(vec!["logs"], "analytics"));

        // No quality, lineage or privacy data: only retention contributes
        let assessment = manager.assess_data_compliance("sys-1").unwrap();
        assert!((assessment.score - 85.0 * 0.2).abs() < 1e-9);
        assert_eq!(assessment.recommendations.len(), 4);
    }
}
