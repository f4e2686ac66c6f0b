// SPDX-FileCopyrightText: 2026 ARIA-SDR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the ARIA-SDR assistant.
//!
//! Only the I/O edges (configuration, HTTP server, knowledge-base client)
//! are fallible. Routing and volume classification are total and never
//! produce an [`AriaError`].

use thiserror::Error;

/// The primary error type shared by the ARIA-SDR crates.
#[derive(Debug, Error)]
pub enum AriaError {
    /// Configuration errors (invalid TOML, bad values, missing secrets).
    #[error("configuration error: {0}")]
    Config(String),

    /// HTTP gateway errors (bind failure, server crash).
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Knowledge-base errors (transport failure, bad status, malformed body).
    #[error("knowledge error: {message}")]
    Knowledge {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
