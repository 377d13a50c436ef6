//! Raw TOML configuration types for host-level settings (§6), mirroring the
//! teacher's `FileConfig` raw-TOML-struct pattern: plain, `#[serde(default)]`
//! structs deserialized directly by figment, then validated.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("temperature must be within [0, 2], got {0}")]
    TemperatureOutOfRange(String),
    #[error("max_tokens must be positive, got {0}")]
    MaxTokensNotPositive(i64),
    #[error("inventory_path must not be empty")]
    EmptyInventoryPath,
    #[error("idle_timeout_minutes must be positive, got {0}")]
    IdleTimeoutNotPositive(i64),
    #[error("cleanup_interval_minutes must be positive, got {0}")]
    CleanupIntervalNotPositive(i64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLlmConfig {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: i64,
}

impl Default for FileLlmConfig {
    fn default() -> Self {
        Self {
            // A small, low-latency model identifier (§6); the real provider
            // binding is out of scope, see `demo_llm`.
            model: "demo-mini".to_string(),
            temperature: 0.1,
            max_tokens: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub llm: FileLlmConfig,
    pub inventory_path: String,
    pub idle_timeout_minutes: i64,
    pub cleanup_interval_minutes: i64,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            llm: FileLlmConfig::default(),
            inventory_path: "./mcp_servers.json".to_string(),
            idle_timeout_minutes: 30,
            cleanup_interval_minutes: 5,
        }
    }
}

impl FileConfig {
    /// Validate every field named in §6; any failure aborts startup
    /// (`HostError::ConfigInvalid`).
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigValidationError::TemperatureOutOfRange(
                self.llm.temperature.to_string(),
            ));
        }
        if self.llm.max_tokens <= 0 {
            return Err(ConfigValidationError::MaxTokensNotPositive(self.llm.max_tokens));
        }
        if self.inventory_path.trim().is_empty() {
            return Err(ConfigValidationError::EmptyInventoryPath);
        }
        if self.idle_timeout_minutes <= 0 {
            return Err(ConfigValidationError::IdleTimeoutNotPositive(
                self.idle_timeout_minutes,
            ));
        }
        if self.cleanup_interval_minutes <= 0 {
            return Err(ConfigValidationError::CleanupIntervalNotPositive(
                self.cleanup_interval_minutes,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(FileConfig::default().validate().is_ok());
    }

    #[test]
    fn temperature_out_of_range_is_rejected() {
        let mut config = FileConfig::default();
        config.llm.temperature = 3.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn deserialize_partial_toml_applies_defaults() {
        let toml_str = r#"
[llm]
model = "custom-model"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.llm.model, "custom-model");
        assert_eq!(config.llm.max_tokens, 1000);
        assert_eq!(config.inventory_path, "./mcp_servers.json");
    }
}
