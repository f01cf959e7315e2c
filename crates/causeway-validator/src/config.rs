//! Validator configuration

use causeway_domain::MAX_LABELLED_COLUMNS;
use serde::{Deserialize, Serialize};

/// Limits applied when creating questions and causes
///
/// # Examples
///
/// ```
/// use causeway_validator::ValidatorConfig;
///
/// let config = ValidatorConfig::default();
/// assert_eq!(config.max_columns, 5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Number of independent chains a question may have (1..=26)
    pub max_columns: u32,

    /// Maximum cause length in characters
    pub max_cause_length: usize,

    /// Maximum question length in characters
    pub max_question_length: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_columns: 5,
            max_cause_length: 120,
            max_question_length: 1000,
        }
    }
}

impl ValidatorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_columns == 0 {
            return Err("max_columns must be greater than 0".to_string());
        }
        if self.max_columns > MAX_LABELLED_COLUMNS {
            return Err(format!(
                "max_columns cannot exceed {} (one letter per column)",
                MAX_LABELLED_COLUMNS
            ));
        }
        if self.max_cause_length == 0 {
            return Err("max_cause_length must be greater than 0".to_string());
        }
        if self.max_question_length == 0 {
            return Err("max_question_length must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
