use crate::{
    error::ConfigurationError,
    rule::{
        PendingCheck, run_checks,
        mask::{MaskRuleConfiguration, checker::MaskRuleConfigurationChecker},
    },
};
use model::core::database_type::DatabaseType;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::info;

/// Configuration of one logical database served by the middleware.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    pub database_name: String,
    #[serde(default)]
    pub database_type: DatabaseType,
    #[serde(default)]
    pub mask: Option<MaskRuleConfiguration>,
}

impl MiddlewareConfig {
    /// Runs every rule checker that applies to this configuration.
    pub fn check(&self) -> Result<(), ConfigurationError> {
        let mut checks = Vec::new();
        if let Some(mask) = &self.mask {
            checks.push(PendingCheck::new(
                MaskRuleConfigurationChecker,
                &self.database_name,
                mask,
            ));
        }
        run_checks(checks)
    }
}

/// Reads a JSON configuration file and checks its rules.
pub fn load_config(path: impl AsRef<Path>) -> Result<MiddlewareConfig, ConfigurationError> {
    let path = path.as_ref();
    info!("Loading configuration from {}", path.display());

    let content = fs::read_to_string(path)?;
    let config: MiddlewareConfig = serde_json::from_str(&content)?;
    config.check()?;

    info!(
        "Loaded configuration for database `{}` ({})",
        config.database_name, config.database_type
    );
    Ok(config)
}
