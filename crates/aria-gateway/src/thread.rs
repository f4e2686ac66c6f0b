// SPDX-FileCopyrightText: 2026 ARIA-SDR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation thread ids.
//!
//! Precedence: `X-Thread-Id` header > body `thread_id` > a stable id derived
//! from the sender and channel > a fresh timestamped id.

use aria_core::Variables;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Sender identifier variable.
pub const REMETENTE: &str = "remetente";
/// Channel variable (`whatsapp`, `web`, ...).
pub const CANAL: &str = "canal";

/// Stable id for a sender on a channel: `thrd_` + 24 hex chars of SHA-256.
pub fn derive_thread_id(remetente: &str, canal: &str) -> String {
    let base = format!("{}:{}", canal.trim(), remetente.trim())
        .trim()
        .to_lowercase();
    let digest = hex::encode(Sha256::digest(base.as_bytes()));
    format!("thrd_{}", &digest[..24])
}

/// One-off id for anonymous turns: `thr_YYYYmmddHHMMSS_xxxx`.
pub fn ephemeral_thread_id(now: DateTime<Utc>, nonce: u16) -> String {
    format!("thr_{}_{nonce:04x}", now.format("%Y%m%d%H%M%S"))
}

/// Pick the thread id for a request.
pub fn resolve_thread_id(
    header: Option<&str>,
    body: Option<&str>,
    variables: &Variables,
) -> String {
    let explicit = [header, body]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|id| !id.is_empty());
    if let Some(id) = explicit {
        return id.to_string();
    }

    let field = |name: &str| {
        variables
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    };
    match (field(REMETENTE), field(CANAL)) {
        (Some(remetente), Some(canal)) => derive_thread_id(remetente, canal),
        _ => ephemeral_thread_id(Utc::now(), rand::random()),
    }
}
