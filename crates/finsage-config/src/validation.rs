// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as score ranges and cooldown ordering.

use crate::diagnostic::ConfigError;
use crate::model::FinsageConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &FinsageConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !(0.0..=100.0).contains(&config.health.healthy_threshold) {
        errors.push(ConfigError::Validation {
            message: format!(
                "health.healthy_threshold must be in [0, 100], got {}",
                config.health.healthy_threshold
            ),
        });
    }

    if config.health.cooldown_base_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "health.cooldown_base_secs must be positive".to_string(),
        });
    }

    if config.health.cooldown_cap_secs < config.health.cooldown_base_secs {
        errors.push(ConfigError::Validation {
            message: format!(
                "health.cooldown_cap_secs ({}) must be >= health.cooldown_base_secs ({})",
                config.health.cooldown_cap_secs, config.health.cooldown_base_secs
            ),
        });
    }

    if config.invocation.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "invocation.request_timeout_secs must be positive".to_string(),
        });
    }

    if !(0.0..=2.0).contains(&config.invocation.temperature) {
        errors.push(ConfigError::Validation {
            message: format!(
                "invocation.temperature must be in [0, 2], got {}",
                config.invocation.temperature
            ),
        });
    }

    for (key, model) in [
        ("routing.light_model", &config.routing.light_model),
        ("routing.standard_model", &config.routing.standard_model),
        ("routing.advanced_model", &config.routing.advanced_model),
    ] {
        if model.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
