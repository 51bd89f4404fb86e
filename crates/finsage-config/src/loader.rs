// SPDX-FileCopyrightText: 2026 Finsage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./finsage.toml` > `~/.config/finsage/finsage.toml`
//! > `/etc/finsage/finsage.toml` with environment variable overrides via the
//! `FINSAGE_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::FinsageConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/finsage/finsage.toml` (system-wide)
/// 3. `~/.config/finsage/finsage.toml` (user XDG config)
/// 4. `./finsage.toml` (local directory)
/// 5. `FINSAGE_*` environment variables
pub fn load_config() -> Result<FinsageConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FinsageConfig::default()))
        .merge(Toml::file("/etc/finsage/finsage.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("finsage/finsage.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("finsage.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<FinsageConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FinsageConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<FinsageConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FinsageConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so underscore-containing
/// key names stay unambiguous: `FINSAGE_ANTHROPIC_API_KEY` must map to
/// `anthropic.api_key`, not `anthropic.api.key`.
fn env_provider() -> Env {
    Env::prefixed("FINSAGE_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("engine_", "engine.", 1)
            .replacen("routing_", "routing.", 1)
            .replacen("health_", "health.", 1)
            .replacen("invocation_", "invocation.", 1)
            .replacen("anthropic_", "anthropic.", 1);
        mapped.into()
    })
}
