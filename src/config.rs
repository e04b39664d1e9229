//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use serde::Deserialize;
use std::net::Ipv4Addr;
use thiserror::Error;

#[derive(Error, Debug)]
#[allow(dead_code)]
pub enum ConfigError {
    #[error("Failed to load environment variables: {0}")]
    EnvLoad(#[from] dotenvy::Error),

    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0),
            port: 8000,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3001".to_string()],
        }
    }
}

/// Governance tuning knobs
#[derive(Debug, Clone, Deserialize)]
pub struct GovernanceConfig {
    /// Overall compliance score at or above which a system counts as compliant
    pub compliance_threshold: f64,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            compliance_threshold: 80.0,
        }
    }
}

/// Complete application settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub governance: GovernanceConfig,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();

        let server = ServerConfig {
            host: std::env::var("HOST")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().port),
        };

        let cors = CorsConfig {
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|| CorsConfig::default().allowed_origins),
        };

        let governance = GovernanceConfig {
            compliance_threshold: match std::env::var("COMPLIANCE_THRESHOLD") {
                Ok(raw) => raw.parse().map_err(|_| {
                    ConfigError::InvalidValue(format!(
                        "COMPLIANCE_THRESHOLD must be a number, got '{}'",
                        raw
                    ))
                })?,
                Err(_) => GovernanceConfig::default().compliance_threshold,
            },
        };

        if !(0.0..=100.0).contains(&governance.compliance_threshold) {
            return Err(ConfigError::InvalidValue(
                "COMPLIANCE_THRESHOLD must be between 0 and 100".to_string(),
            ));
        }

        Ok(Self {
            server,
            cors,
            governance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_server_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_default_governance_config() {
        let config = GovernanceConfig::default();
        assert_eq!(config.compliance_threshold, 80.0);
    }

    #[test]
    fn test_default_cors_config() {
        let config = CorsConfig::default();
        assert_eq!(config.allowed_origins.len(), 1);
    }
}
