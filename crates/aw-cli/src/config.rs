//! Configuration loading for the Asset Warden CLI.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use aw_core::EngineConfig;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Engine settings (deadline thresholds, display limits).
    #[serde(default)]
    pub engine: EngineConfig,

    /// Default snapshot file to load when none is given on the command line.
    #[serde(default)]
    pub snapshot_path: Option<String>,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Logging section of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_level")]
    pub level: String,

    /// Whether to emit JSON logs.
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.engine.deadline.early_warning_hours, 24);
        assert_eq!(config.engine.deadline.notification_hours, 72);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "engine:\n  deadline:\n    expiry_warning_days: 45\n";
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.engine.deadline.expiry_warning_days, 45);
        assert_eq!(config.engine.deadline.early_warning_hours, 24);
        assert!(config.snapshot_path.is_none());
    }
}
