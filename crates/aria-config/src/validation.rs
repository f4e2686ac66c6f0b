// SPDX-FileCopyrightText: 2026 ARIA-SDR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as bindable addresses, usable endpoints and positive limits.

use crate::diagnostic::ConfigError;
use crate::model::AriaConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &AriaConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut invalid = |message: String| errors.push(ConfigError::Validation { message });

    let level = config.agent.log_level.trim().to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        invalid(format!(
            "agent.log_level `{}` must be one of {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    let host = config.gateway.host.trim();
    if host.is_empty() {
        invalid("gateway.host must not be empty".to_string());
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            invalid(format!(
                "gateway.host `{host}` is not a valid IP address or hostname"
            ));
        }
    }

    if config.gateway.port == 0 {
        invalid("gateway.port must be between 1 and 65535".to_string());
    }

    if let Some(token) = &config.gateway.bearer_token
        && token.trim().is_empty()
    {
        invalid("gateway.bearer_token must not be blank when set".to_string());
    }

    let knowledge = &config.knowledge;
    if knowledge.top_k == 0 {
        invalid("knowledge.top_k must be at least 1".to_string());
    }
    if knowledge.timeout_secs == 0 {
        invalid("knowledge.timeout_secs must be at least 1".to_string());
    }
    if knowledge.enabled
        && !(knowledge.endpoint.starts_with("http://") || knowledge.endpoint.starts_with("https://"))
    {
        invalid(format!(
            "knowledge.endpoint `{}` must be an http:// or https:// URL",
            knowledge.endpoint
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
