// SPDX-FileCopyrightText: 2026 Voxa Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as URL shape, non-empty paths, and sane intervals.

use crate::diagnostic::ConfigError;
use crate::model::VoxaConfig;

/// Valid log level names accepted by `agent.log_level`.
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &VoxaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "agent.log_level must be one of {}, got `{}`",
                LOG_LEVELS.join(", "),
                config.agent.log_level
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    let base_url = config.gateway.base_url.trim();
    if base_url.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.base_url must not be empty".to_string(),
        });
    } else if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        errors.push(ConfigError::Validation {
            message: format!("gateway.base_url must start with http:// or https://, got `{base_url}`"),
        });
    }

    if config.gateway.probe_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "gateway.probe_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.gateway.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "gateway.request_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.sync.interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "sync.interval_secs must be at least 1".to_string(),
        });
    }

    if let Some(days) = config.sync.retain_days {
        if days == 0 {
            errors.push(ConfigError::Validation {
                message: "sync.retain_days must be at least 1 when set (omit to disable)"
                    .to_string(),
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = VoxaConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let mut config = VoxaConfig::default();
        config.agent.log_level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("log_level"));
    }

    #[test]
    fn url_without_scheme_is_rejected() {
        let mut config = VoxaConfig::default();
        config.gateway.base_url = "backend.example.com/api".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("base_url"));
    }

    #[test]
    fn all_errors_are_collected_not_just_first() {
        let mut config = VoxaConfig::default();
        config.storage.database_path = "  ".to_string();
        config.sync.interval_secs = 0;
        config.gateway.probe_timeout_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn zero_retain_days_is_rejected() {
        let mut config = VoxaConfig::default();
        config.sync.retain_days = Some(0);
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("retain_days"));
    }
}
