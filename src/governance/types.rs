//! Shared governance types
//!
//! The system profile submitted at registration time and the enums
//! used across all governance domains.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Governance levels assigned to registered AI systems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GovernanceLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl GovernanceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GovernanceLevel::Low => "low",
            GovernanceLevel::Medium => "medium",
            GovernanceLevel::High => "high",
            GovernanceLevel::Critical => "critical",
        }
    }
}

/// Risk levels shared by the model risk and ISO domains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

/// Declared sensitivity of the data a system processes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataSensitivity {
    Low,
    #[default]
    Medium,
    High,
}

/// Metadata describing an AI system at registration time
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SystemProfile {
    #[validate(length(min = 1, message = "system id must not be empty"))]
    pub system_id: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, message = "use case must not be empty"))]
    pub use_case: String,
    #[serde(default)]
    pub model_type: String,
    #[serde(default)]
    pub data_sources: Vec<String>,
    #[serde(default)]
    pub data_types: Vec<String>,
    #[serde(default)]
    pub data_sensitivity: DataSensitivity,
    #[serde(default)]
    pub risk_factors: Vec<String>,
    #[serde(default)]
    pub jurisdictions: Vec<String>,
    #[serde(default)]
    pub cloud_provider: String,
    #[serde(default)]
    pub industry_sector: String,
    #[serde(default)]
    pub regulatory_scope: Vec<String>,
    #[serde(default)]
    pub quality_critical: bool,
}

impl SystemProfile {
    /// Case-insensitive check whether the use case mentions any of the needles
    pub fn use_case_matches(&self, needles: &[&str]) -> bool {
        let use_case = self.use_case.to_lowercase();
        needles.iter().any(|n| use_case.contains(n))
    }

    /// Case-insensitive check whether any declared data type matches
    pub fn has_data_type(&self, needles: &[&str]) -> bool {
        self.data_types
            .iter()
            .any(|t| needles.contains(&t.to_lowercase().as_str()))
    }

    /// Case-insensitive check whether any jurisdiction matches
    pub fn in_jurisdiction(&self, needles: &[&str]) -> bool {
        self.jurisdictions
            .iter()
            .any(|j| needles.contains(&j.to_lowercase().as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> SystemProfile {
        SystemProfile {
            system_id: "sys-1".to_string(),
            name: "Credit Scorer".to_string(),
            description: String::new(),
            use_case: "credit_scoring".to_string(),
            model_type: "neural_network".to_string(),
            data_sources: vec!["core_banking".to_string()],
            data_types: vec!["PII".to_string(), "financial".to_string()],
            data_sensitivity: DataSensitivity::High,
            risk_factors: vec!["automated_decisions".to_string()],
            jurisdictions: vec!["EU".to_string()],
            cloud_provider: "aws".to_string(),
            industry_sector: "financial_services".to_string(),
            regulatory_scope: vec![],
            quality_critical: false,
        }
    }

    #[test]
    fn test_use_case_matching_is_case_insensitive() {
        let mut p = profile();
        p.use_case = "Credit_Scoring".to_string();
        assert!(p.use_case_matches(&["credit"]));
        assert!(!p.use_case_matches(&["fraud"]));
    }

    #[test]
    fn test_data_type_matching_normalizes_case() {
        let p = profile();
        assert!(p.has_data_type(&["pii"]));
        assert!(!p.has_data_type(&["biometric"]));
    }

    #[test]
    fn test_jurisdiction_matching() {
        let p = profile();
        assert!(p.in_jurisdiction(&["eu"]));
        assert!(!p.in_jurisdiction(&["us"]));
    }
}
