// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Finsage engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Finsage configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FinsageConfig {
    /// Engine-wide behavior settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Model routing settings.
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Provider health monitor settings.
    #[serde(default)]
    pub health: HealthConfig,

    /// Provider invocation settings.
    #[serde(default)]
    pub invocation: InvocationConfig,

    /// Anthropic API settings.
    #[serde(default)]
    pub anthropic: AnthropicConfig,
}

/// Engine-wide behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Maximum clarifying questions returned to the caller.
    #[serde(default = "default_max_questions")]
    pub max_clarifying_questions: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            max_clarifying_questions: default_max_questions(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_questions() -> usize {
    3
}

/// Model routing configuration.
///
/// Maps capability tiers to concrete model identifiers. The policy table in
/// `finsage-router` picks a tier from (domain, complexity, subscription);
/// these settings pick the model within the tier.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Model identifier for the light capability tier.
    #[serde(default = "default_light_model")]
    pub light_model: String,

    /// Model identifier for the standard capability tier.
    #[serde(default = "default_standard_model")]
    pub standard_model: String,

    /// Model identifier for the advanced capability tier.
    #[serde(default = "default_advanced_model")]
    pub advanced_model: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            light_model: default_light_model(),
            standard_model: default_standard_model(),
            advanced_model: default_advanced_model(),
        }
    }
}

fn default_light_model() -> String {
    "claude-haiku-4-5-20250901".to_string()
}

fn default_standard_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_advanced_model() -> String {
    "claude-opus-4-20250514".to_string()
}

/// Provider health monitor configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HealthConfig {
    /// Health score below which a provider is considered unhealthy (0-100).
    #[serde(default = "default_healthy_threshold")]
    pub healthy_threshold: f64,

    /// Initial rate-limit cooldown in seconds; doubles per consecutive hit.
    #[serde(default = "default_cooldown_base_secs")]
    pub cooldown_base_secs: u64,

    /// Upper bound on the escalated rate-limit cooldown in seconds.
    #[serde(default = "default_cooldown_cap_secs")]
    pub cooldown_cap_secs: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            healthy_threshold: default_healthy_threshold(),
            cooldown_base_secs: default_cooldown_base_secs(),
            cooldown_cap_secs: default_cooldown_cap_secs(),
        }
    }
}

fn default_healthy_threshold() -> f64 {
    40.0
}

fn default_cooldown_base_secs() -> u64 {
    30
}

fn default_cooldown_cap_secs() -> u64 {
    900
}

/// Provider invocation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InvocationConfig {
    /// Per-call deadline for a single provider request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Sampling temperature passed to providers.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max response tokens requested from providers.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for InvocationConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    45
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    4096
}

/// Anthropic API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// API key. Usually supplied via `FINSAGE_ANTHROPIC_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// API version header value.
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_version: default_api_version(),
        }
    }
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}
