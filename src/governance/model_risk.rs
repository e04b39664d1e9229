//! Model Risk Management
//!
//! Risk assessment and monitoring for AI/ML models: lifecycle-aware risk
//! scoring, validation history tracking and performance monitoring with
//! alerting thresholds.

use crate::error::AppError;
use crate::governance::types::{DataSensitivity, RiskLevel, SystemProfile};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Validation history entries are considered stale after this many days
const VALIDATION_STALE_DAYS: i64 = 180;
/// Monitoring data is considered stale after this many days
const MONITORING_STALE_DAYS: i64 = 7;
/// Cap on retained performance metric entries per system
const METRICS_RETENTION: usize = 1000;

/// Model lifecycle stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelLifecycleStage {
    Development,
    Validation,
    Production,
    Monitoring,
    Retirement,
}

/// Registration record for a model under risk management
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRecord {
    pub system_id: String,
    pub model_type: String,
    pub use_case: String,
    pub risk_level: RiskLevel,
    pub lifecycle_stage: ModelLifecycleStage,
    pub registered_at: DateTime<Utc>,
    pub validation_requirements: Vec<String>,
    pub monitoring_requirements: Vec<String>,
}

/// Submitted validation results and documentation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSubmission {
    #[serde(default)]
    pub validation_type: Option<String>,
    #[serde(default)]
    pub tests: Option<Vec<String>>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub performance: HashMap<String, f64>,
    #[serde(default)]
    pub bias: HashMap<String, f64>,
    #[serde(default)]
    pub stability: HashMap<String, f64>,
    #[serde(default)]
    pub validator: Option<String>,
    #[serde(default)]
    pub comments: String,
}

/// Outcome of a model validation run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub validation_id: Uuid,
    pub system_id: String,
    pub validated_at: DateTime<Utc>,
    pub validation_type: String,
    pub tests_performed: Vec<String>,
    pub overall_score: f64,
    pub performance_metrics: HashMap<String, f64>,
    pub bias_metrics: HashMap<String, f64>,
    pub stability_metrics: HashMap<String, f64>,
    pub passed: bool,
    pub validator: String,
    pub comments: String,
}

/// Performance metrics reported for ongoing monitoring
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    #[serde(default)]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub precision: Option<f64>,
    #[serde(default)]
    pub data_drift_score: Option<f64>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// A logged metrics entry with any alerts it triggered
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsEntry {
    pub timestamp: DateTime<Utc>,
    pub metrics: PerformanceMetrics,
    pub alerts: Vec<String>,
}

/// Risk assessment result for a registered model
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRiskAssessment {
    pub system_id: String,
    pub assessed_at: DateTime<Utc>,
    pub risk_level: RiskLevel,
    pub score: f64,
    pub risk_score: f64,
    pub validation_compliance: f64,
    pub monitoring_compliance: f64,
    pub recommendations: Vec<String>,
    pub next_review_date: DateTime<Utc>,
}

/// Trend direction for performance over time
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendAnalysis {
    pub trend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub historical_average: Option<f64>,
}

/// Comprehensive model risk report
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelReport {
    pub model_info: ModelRecord,
    pub total_validations: usize,
    pub last_validation: Option<ValidationOutcome>,
    pub validation_pass_rate: f64,
    pub total_metrics: usize,
    pub latest_metrics: Option<MetricsEntry>,
    pub trend_analysis: TrendAnalysis,
    pub recent_alerts: Vec<String>,
    pub risk_assessment: ModelRiskAssessment,
}

/// Manages model risk assessment and monitoring for AI systems
#[derive(Default)]
pub struct ModelRiskManager {
    registered_models: HashMap<String, ModelRecord>,
    validation_history: HashMap<String, Vec<ValidationOutcome>>,
    performance_metrics: HashMap<String, Vec<MetricsEntry>>,
}

impl ModelRiskManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a system for model risk management
    pub fn register_system(&mut self, profile: &SystemProfile) {
        let risk_level = Self::assess_model_risk_level(profile);
        let record = ModelRecord {
            system_id: profile.system_id.clone(),
            model_type: profile.model_type.clone(),
            use_case: profile.use_case.clone(),
            risk_level,
            lifecycle_stage: ModelLifecycleStage::Development,
            registered_at: Utc::now(),
            validation_requirements: Self::validation_requirements(risk_level),
            monitoring_requirements: Self::monitoring_requirements(risk_level),
        };

        self.registered_models
            .insert(profile.system_id.clone(), record);
        self.validation_history
            .insert(profile.system_id.clone(), Vec::new());
        self.performance_metrics
            .insert(profile.system_id.clone(), Vec::new());
    }

    /// Assess model risk for a registered system
    pub fn assess_model_risk(&self, system_id: &str) -> Result<ModelRiskAssessment, AppError> {
        let record = self.record(system_id)?;

        let risk_score = Self::risk_score(record);
        let validation_compliance = self.validation_compliance(system_id);
        let monitoring_compliance = self.monitoring_compliance(system_id);
        let overall = (risk_score + validation_compliance + monitoring_compliance) / 3.0;

        Ok(ModelRiskAssessment {
            system_id: system_id.to_string(),
            assessed_at: Utc::now(),
            risk_level: record.risk_level,
            score: overall,
            risk_score,
            validation_compliance,
            monitoring_compliance,
            recommendations: self.recommendations(system_id, overall),
            next_review_date: Utc::now() + Duration::days(90),
        })
    }

    /// Perform model validation and record the outcome
    pub fn validate_model(
        &mut self,
        system_id: &str,
        submission: ValidationSubmission,
    ) -> Result<ValidationOutcome, AppError> {
        self.record(system_id)?;

        let score = submission.score.unwrap_or(85.0);
        let outcome = ValidationOutcome {
            validation_id: Uuid::new_v4(),
            system_id: system_id.to_string(),
            validated_at: Utc::now(),
            validation_type: submission
                .validation_type
                .unwrap_or_else(|| "periodic".to_string()),
            tests_performed: submission.tests.unwrap_or_else(|| {
                vec![
                    "statistical_performance".to_string(),
                    "bias_analysis".to_string(),
                    "model_stability".to_string(),
                    "data_quality".to_string(),
                ]
            }),
            overall_score: score,
            performance_metrics: submission.performance,
            bias_metrics: submission.bias,
            stability_metrics: submission.stability,
            passed: score >= 70.0,
            validator: submission
                .validator
                .unwrap_or_else(|| "internal".to_string()),
            comments: submission.comments,
        };

        if outcome.passed {
            if let Some(record) = self.registered_models.get_mut(system_id) {
                record.lifecycle_stage = ModelLifecycleStage::Production;
            }
        }

        self.validation_history
            .entry(system_id.to_string())
            .or_default()
            .push(outcome.clone());

        Ok(outcome)
    }

    /// Log performance metrics for ongoing monitoring
    pub fn log_performance_metrics(
        &mut self,
        system_id: &str,
        metrics: PerformanceMetrics,
    ) -> Result<Vec<String>, AppError> {
        self.record(system_id)?;

        let alerts = Self::performance_alerts(&metrics);
        let history = self
            .performance_metrics
            .entry(system_id.to_string())
            .or_default();
        history.push(MetricsEntry {
            timestamp: Utc::now(),
            metrics,
            alerts: alerts.clone(),
        });

        // Bound memory growth per system
        if history.len() > METRICS_RETENTION {
            let excess = history.len() - METRICS_RETENTION;
            history.drain(..excess);
        }

        Ok(alerts)
    }

    /// Generate comprehensive model risk report
    pub fn get_model_report(&self, system_id: &str) -> Result<ModelReport, AppError> {
        let record = self.record(system_id)?;
        let validations = self
            .validation_history
            .get(system_id)
            .cloned()
            .unwrap_or_default();
        let metrics = self
            .performance_metrics
            .get(system_id)
            .cloned()
            .unwrap_or_default();

        let pass_rate = if validations.is_empty() {
            0.0
        } else {
            validations.iter().filter(|v| v.passed).count() as f64 / validations.len() as f64
                * 100.0
        };

        Ok(ModelReport {
            model_info: record.clone(),
            total_validations: validations.len(),
            last_validation: validations.last().cloned(),
            validation_pass_rate: pass_rate,
            total_metrics: metrics.len(),
            latest_metrics: metrics.last().cloned(),
            trend_analysis: Self::analyze_trends(&metrics),
            recent_alerts: Self::recent_alerts(&metrics),
            risk_assessment: self.assess_model_risk(system_id)?,
        })
    }

    pub fn is_registered(&self, system_id: &str) -> bool {
        self.registered_models.contains_key(system_id)
    }

    fn record(&self, system_id: &str) -> Result<&ModelRecord, AppError> {
        self.registered_models.get(system_id).ok_or_else(|| {
            AppError::NotFound(format!(
                "System {} not registered for model risk management",
                system_id
            ))
        })
    }

    /// Classify model risk from use case, model type and data sensitivity
    fn assess_model_risk_level(profile: &SystemProfile) -> RiskLevel {
        let mut score = 0u32;

        if profile.use_case_matches(&["credit", "fraud", "compliance", "pricing"]) {
            score += 3;
        }

        let model_type = profile.model_type.to_lowercase();
        if ["neural", "deep", "ensemble"]
            .iter()
            .any(|m| model_type.contains(m))
        {
            score += 2;
        }

        match profile.data_sensitivity {
            DataSensitivity::High => score += 2,
            DataSensitivity::Medium => score += 1,
            DataSensitivity::Low => {}
        }

        match score {
            s if s >= 5 => RiskLevel::Critical,
            s if s >= 3 => RiskLevel::High,
            s if s >= 1 => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    fn validation_requirements(risk_level: RiskLevel) -> Vec<String> {
        let mut requirements = vec![
            "model_documentation".to_string(),
            "performance_testing".to_string(),
            "data_quality_validation".to_string(),
        ];

        if matches!(
            risk_level,
            RiskLevel::Medium | RiskLevel::High | RiskLevel::Critical
        ) {
            requirements.extend([
                "bias_testing".to_string(),
                "stability_testing".to_string(),
                "sensitivity_analysis".to_string(),
            ]);
        }

        if matches!(risk_level, RiskLevel::High | RiskLevel::Critical) {
            requirements.extend([
                "independent_validation".to_string(),
                "stress_testing".to_string(),
                "challenger_model_comparison".to_string(),
            ]);
        }

        if risk_level == RiskLevel::Critical {
            requirements.extend([
                "regulatory_review".to_string(),
                "board_approval".to_string(),
                "continuous_validation".to_string(),
            ]);
        }

        requirements
    }

    fn monitoring_requirements(risk_level: RiskLevel) -> Vec<String> {
        let mut requirements = vec![
            "performance_tracking".to_string(),
            "prediction_monitoring".to_string(),
            "data_drift_detection".to_string(),
        ];

        if matches!(risk_level, RiskLevel::High | RiskLevel::Critical) {
            requirements.extend([
                "real_time_monitoring".to_string(),
                "automated_alerts".to_string(),
                "escalation_procedures".to_string(),
            ]);
        }

        requirements
    }

    /// Base risk score from level, adjusted for lifecycle stage, capped at 100
    fn risk_score(record: &ModelRecord) -> f64 {
        let base: f64 = match record.risk_level {
            RiskLevel::Low => 90.0,
            RiskLevel::Medium => 75.0,
            RiskLevel::High => 60.0,
            RiskLevel::Critical => 45.0,
        };

        let adjusted = match record.lifecycle_stage {
            ModelLifecycleStage::Production => base + 10.0,
            ModelLifecycleStage::Validation => base + 5.0,
            _ => base,
        };

        adjusted.min(100.0)
    }

    fn validation_compliance(&self, system_id: &str) -> f64 {
        let history = match self.validation_history.get(system_id) {
            Some(h) if !h.is_empty() => h,
            _ => return 0.0,
        };

        let cutoff = Utc::now() - Duration::days(VALIDATION_STALE_DAYS);
        let recent: Vec<_> = history.iter().filter(|v| v.validated_at > cutoff).collect();

        if recent.is_empty() {
            return 30.0;
        }

        let passed = recent.iter().filter(|v| v.passed).count();
        passed as f64 / recent.len() as f64 * 100.0
    }

    fn monitoring_compliance(&self, system_id: &str) -> f64 {
        let history = match self.performance_metrics.get(system_id) {
            Some(h) if !h.is_empty() => h,
            _ => return 0.0,
        };

        let cutoff = Utc::now() - Duration::days(MONITORING_STALE_DAYS);
        let recent: Vec<_> = history.iter().filter(|m| m.timestamp > cutoff).collect();

        if recent.is_empty() {
            return 40.0;
        }

        let alerting = recent.iter().filter(|m| !m.alerts.is_empty()).count();
        let alert_rate = alerting as f64 / recent.len() as f64;
        (100.0 - alert_rate * 50.0).max(50.0)
    }

    fn recommendations(&self, system_id: &str, score: f64) -> Vec<String> {
        let mut recommendations = Vec::new();

        if score < 70.0 {
            recommendations
                .push("Immediate review required - compliance below threshold".to_string());
        }
        if score < 50.0 {
            recommendations
                .push("Consider suspending model until compliance improves".to_string());
        }

        let validations = self.validation_history.get(system_id);
        match validations {
            Some(h) if !h.is_empty() => {
                let last = &h[h.len() - 1];
                if Utc::now() - last.validated_at > Duration::days(VALIDATION_STALE_DAYS) {
                    recommendations.push(
                        "Update model validation - last validation is outdated".to_string(),
                    );
                }
            }
            _ => recommendations.push("Perform initial model validation".to_string()),
        }

        let metrics = self.performance_metrics.get(system_id);
        match metrics {
            Some(h) if !h.is_empty() => {
                let last = &h[h.len() - 1];
                if Utc::now() - last.timestamp > Duration::days(MONITORING_STALE_DAYS) {
                    recommendations
                        .push("Update performance monitoring - data is stale".to_string());
                }
            }
            _ => recommendations.push("Implement performance monitoring".to_string()),
        }

        recommendations
    }

    /// Compare the 10 most recent accuracy readings against the 10 before them
    fn analyze_trends(history: &[MetricsEntry]) -> TrendAnalysis {
        if history.len() < 20 {
            return TrendAnalysis {
                trend: if history.len() < 2 {
                    "insufficient_data".to_string()
                } else {
                    "insufficient_historical_data".to_string()
                },
                recent_average: None,
                historical_average: None,
            };
        }

        let accuracy = |entries: &[MetricsEntry]| -> f64 {
            entries
                .iter()
                .map(|m| m.metrics.accuracy.unwrap_or(0.0))
                .sum::<f64>()
                / entries.len() as f64
        };

        let recent = accuracy(&history[history.len() - 10..]);
        let older = accuracy(&history[history.len() - 20..history.len() - 10]);

        let trend = if recent > older + 0.05 {
            "improving"
        } else if recent < older - 0.05 {
            "degrading"
        } else {
            "stable"
        };

        TrendAnalysis {
            trend: trend.to_string(),
            recent_average: Some(recent),
            historical_average: Some(older),
        }
    }

    /// Last 10 alerts raised across the 30 most recent entries
    fn recent_alerts(history: &[MetricsEntry]) -> Vec<String> {
        let start = history.len().saturating_sub(30);
        let mut alerts: Vec<String> = history[start..]
            .iter()
            .flat_map(|m| m.alerts.iter().cloned())
            .collect();
        let keep = alerts.len().saturating_sub(10);
        alerts.drain(..keep);
        alerts
    }

    fn performance_alerts(metrics: &PerformanceMetrics) -> Vec<String> {
        let mut alerts = Vec::new();

        let accuracy = metrics.accuracy.unwrap_or(1.0);
        if accuracy < 0.8 {
            alerts.push(format!("Low accuracy detected: {:.2}", accuracy));
        }

        let precision = metrics.precision.unwrap_or(1.0);
        if precision < 0.7 {
            alerts.push(format!("Low precision detected: {:.2}", precision));
        }

        let drift = metrics.data_drift_score.unwrap_or(0.0);
        if drift > 0.3 {
            alerts.push(format!("High data drift detected: {:.2}", drift));
        }

        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(use_case: &str, model_type: &str, sensitivity: DataSensitivity) -> SystemProfile {
        SystemProfile {
            system_id: "sys-1".to_string(),
            name: "Test System".to_string(),
            description: String::new(),
            use_case: use_case.to_string(),
            model_type: model_type.to_string(),
            data_sources: vec![],
            data_types: vec![],
            data_sensitivity: sensitivity,
            risk_factors: vec![],
            jurisdictions: vec![],
            cloud_provider: String::new(),
            industry_sector: String::new(),
            regulatory_scope: vec![],
            quality_critical: false,
        }
    }

    #[test]
    fn test_risk_level_classification() {
        let critical = profile("credit_scoring", "deep_neural_network", DataSensitivity::Medium);
        assert_eq!(
            ModelRiskManager::assess_model_risk_level(&critical),
            RiskLevel::Critical
        );

        let high = profile("fraud_detection", "logistic_regression", DataSensitivity::Low);
        assert_eq!(
            ModelRiskManager::assess_model_risk_level(&high),
            RiskLevel::High
        );

        let medium = profile("recommendations", "linear", DataSensitivity::Medium);
        assert_eq!(
            ModelRiskManager::assess_model_risk_level(&medium),
            RiskLevel::Medium
        );

        let low = profile("recommendations", "linear", DataSensitivity::Low);
        assert_eq!(
            ModelRiskManager::assess_model_risk_level(&low),
            RiskLevel::Low
        );
    }

    #[test]
    fn test_assessment_requires_registration() {
        let manager = ModelRiskManager::new();
        assert!(manager.assess_model_risk("missing").is_err());
    }

    #[test]
    fn test_validation_promotes_lifecycle_on_pass() {
        let mut manager = ModelRiskManager::new();
        manager.register_system(&profile("analytics", "linear", DataSensitivity::Low));

        let outcome = manager
            .validate_model(
                "sys-1",
                ValidationSubmission {
                    score: Some(82.0),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(outcome.passed);
        assert_eq!(
            manager.registered_models["sys-1"].lifecycle_stage,
            ModelLifecycleStage::Production
        );
    }

    #[test]
    fn test_failed_validation_keeps_lifecycle() {
        let mut manager = ModelRiskManager::new();
        manager.register_system(&profile("analytics", "linear", DataSensitivity::Low));

        let outcome = manager
            .validate_model(
                "sys-1",
                ValidationSubmission {
                    score: Some(55.0),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(!outcome.passed);
        assert_eq!(
            manager.registered_models["sys-1"].lifecycle_stage,
            ModelLifecycleStage::Development
        );
    }

    #[test]
    fn test_performance_alerts_thresholds() {
        let alerts = ModelRiskManager::performance_alerts(&PerformanceMetrics {
            accuracy: Some(0.75),
            precision: Some(0.65),
            data_drift_score: Some(0.4),
            extra: HashMap::new(),
        });
        assert_eq!(alerts.len(), 3);

        let clean = ModelRiskManager::performance_alerts(&PerformanceMetrics {
            accuracy: Some(0.95),
            precision: Some(0.9),
            data_drift_score: Some(0.1),
            extra: HashMap::new(),
        });
        assert!(clean.is_empty());
    }

    #[test]
    fn test_metrics_retention_cap() {
        let mut manager = ModelRiskManager::new();
        manager.register_system(&profile("analytics", "linear", DataSensitivity::Low));

        for _ in 0..(METRICS_RETENTION + 50) {
            manager
                .log_performance_metrics("sys-1", PerformanceMetrics::default())
                .unwrap();
        }

        assert_eq!(
            manager.performance_metrics["sys-1"].len(),
            METRICS_RETENTION
        );
    }

    #[test]
    fn test_assessment_combines_three_components() {
        let mut manager = ModelRiskManager::new();
        manager.register_system(&profile("analytics", "linear", DataSensitivity::Low));

        // No validations or metrics yet: risk 90, validation 0, monitoring 0
        let assessment = manager.assess_model_risk("sys-1").unwrap();
        assert_eq!(assessment.risk_score, 90.0);
        assert_eq!(assessment.validation_compliance, 0.0);
        assert_eq!(assessment.monitoring_compliance, 0.0);
        assert_eq!(assessment.score, 30.0);
        assert!(assessment
            .recommendations
            .contains(&"Perform initial model validation".to_string()));
    }

    #[test]
    fn test_report_pass_rate() {
        let mut manager = ModelRiskManager::new();
        manager.register_system(&profile("analytics", "linear", DataSensitivity::Low));

        for score in [80.0, 90.0, 60.0, 75.0] {
            manager
                .validate_model(
                    "sys-1",
                    ValidationSubmission {
                        score: Some(score),
                        ..Default::default()
                    },
                )
                .unwrap();
        }

        let report = manager.get_model_report("sys-1").unwrap();
        assert_eq!(report.total_validations, 4);
        assert_eq!(report.validation_pass_rate, 75.0);
    }
}
