// SPDX-FileCopyrightText: 2026 ARIA-SDR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `aria classify` command implementation.

use aria_core::{AriaError, Variables};
use aria_router::classify_route;

/// Parse a `key=value` argument. The value may itself contain `=`.
pub fn parse_var(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty variable name in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Classify `text` and render the result as pretty JSON.
pub fn run_classify(text: &str, vars: Vec<(String, String)>) -> Result<String, AriaError> {
    let variables: Variables = vars.into_iter().collect();
    let output = classify_route(text, &variables);
    serde_json::to_string_pretty(&output)
        .map_err(|e| AriaError::Internal(format!("failed to render classification: {e}")))
}
