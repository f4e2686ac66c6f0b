// SPDX-FileCopyrightText: 2026 ARIA-SDR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./aria.toml` > `~/.config/aria/aria.toml` > `/etc/aria/aria.toml`
//! with environment variable overrides via `ARIA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::AriaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/aria/aria.toml` (system-wide)
/// 3. `~/.config/aria/aria.toml` (user XDG config)
/// 4. `./aria.toml` (local directory)
/// 5. `ARIA_*` environment variables
pub fn load_config() -> Result<AriaConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<AriaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AriaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<AriaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AriaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(AriaConfig::default()))
        .merge(Toml::file("/etc/aria/aria.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("aria/aria.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("aria.toml"))
        .merge(env_provider())
}

/// Environment provider with explicit section mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` so that
/// `ARIA_GATEWAY_BEARER_TOKEN` maps to `gateway.bearer_token`, not
/// `gateway.bearer.token`. Keys arrive with their original casing.
fn env_provider() -> Env {
    Env::prefixed("ARIA_").map(|key| {
        let mapped = key
            .as_str()
            .to_ascii_lowercase()
            .replacen("agent_", "agent.", 1)
            .replacen("gateway_", "gateway.", 1)
            .replacen("knowledge_", "knowledge.", 1);
        mapped.into()
    })
}
