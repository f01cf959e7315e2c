//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use causeway_domain::UserId;
use causeway_llm::ProviderConfig;
use causeway_validator::ValidatorConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database file
    pub database: PathBuf,

    /// User the CLI acts as
    pub owner: String,

    /// Diagram limits
    pub validator: ValidatorConfig,

    /// Oracle backend
    pub provider: ProviderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from("causeway.db"),
            owner: UserId::local().to_string(),
            validator: ValidatorConfig::default(),
            provider: ProviderConfig::default(),
        }
    }
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".causeway").join("config.toml"))
    }

    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the default path is used if
    /// present and built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Self::path()?;
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Check every section
    pub fn validate(&self) -> Result<()> {
        self.validator.validate().map_err(CliError::Config)?;
        self.provider.validate().map_err(CliError::Config)?;
        self.owner_id()?;
        Ok(())
    }

    /// The configured owner as a user id
    pub fn owner_id(&self) -> Result<UserId> {
        UserId::from_string(&self.owner)
            .map_err(|e| CliError::Config(format!("Invalid owner '{}': {}", self.owner, e)))
    }
}
