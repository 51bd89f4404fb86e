// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Finsage configuration system.

use finsage_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_finsage_config() {
    let toml = r#"
[engine]
log_level = "debug"
max_clarifying_questions = 2

[routing]
light_model = "claude-haiku-4-5-20250901"
standard_model = "claude-sonnet-4-20250514"
advanced_model = "claude-opus-4-20250514"

[health]
healthy_threshold = 35.0
cooldown_base_secs = 15
cooldown_cap_secs = 600

[invocation]
request_timeout_secs = 30
temperature = 0.1
max_tokens = 2048

[anthropic]
api_key = "sk-ant-test"
api_version = "2023-06-01"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.engine.log_level, "debug");
    assert_eq!(config.engine.max_clarifying_questions, 2);
    assert!(config.routing.light_model.contains("haiku"));
    assert!((config.health.healthy_threshold - 35.0).abs() < f64::EPSILON);
    assert_eq!(config.health.cooldown_base_secs, 15);
    assert_eq!(config.invocation.request_timeout_secs, 30);
    assert_eq!(config.invocation.max_tokens, 2048);
    assert_eq!(config.anthropic.api_key.as_deref(), Some("sk-ant-test"));
}

/// Empty TOML yields the compiled defaults.
#[test]
fn empty_toml_yields_defaults() {
    let config = load_config_from_str("").expect("empty config should use defaults");
    assert_eq!(config.engine.log_level, "info");
    assert_eq!(config.engine.max_clarifying_questions, 3);
    assert_eq!(config.invocation.request_timeout_secs, 45);
}

/// Unknown field in a section produces an error mentioning the bad key.
#[test]
fn unknown_field_produces_error() {
    let toml = r#"
[routing]
light_modle = "x"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("light_modle"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unknown section at the top level is rejected.
#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[telemetry]
enabled = true
"#;

    assert!(load_config_from_str(toml).is_err());
}

/// Semantic validation rejects out-of-range values after deserialization.
#[test]
fn load_and_validate_str_runs_validation() {
    let toml = r#"
[health]
healthy_threshold = 400.0
"#;

    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert!(errors
        .iter()
        .any(|e| e.to_string().contains("healthy_threshold")));
}

/// Valid config passes the combined load-and-validate path.
#[test]
fn load_and_validate_str_accepts_valid_config() {
    let toml = r#"
[invocation]
request_timeout_secs = 20
"#;

    let config = load_and_validate_str(toml).expect("valid config");
    assert_eq!(config.invocation.request_timeout_secs, 20);
}
