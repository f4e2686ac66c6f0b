// SPDX-FileCopyrightText: 2026 ARIA-SDR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Monthly volume extraction from free text.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// A thousands-grouped number (`1.500`, `2,000`, `1.250.000`) or a plain digit run.
static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{1,3}(?:[.,][0-9]{3})+|[0-9]+").unwrap());

/// Qualitative phrases that imply a high monthly volume.
static HIGH_VOLUME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(alto volume|grande volume|massivo|lote|mil|1k|1000\+|acima de|>\s*1000)")
        .unwrap()
});

/// What the extractor found in a volume hint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VolumeSignal {
    /// The last number mentioned, separators stripped.
    pub parsed_number: Option<u64>,
    /// Whether any high-volume phrase appears, regardless of `parsed_number`.
    pub high_volume_keyword_present: bool,
}

/// Extract a [`VolumeSignal`] from `text`.
///
/// The *last* numeric token wins: in "ignore 50, eu quero 3000" the volume
/// is 3000. Tokens too large for a `u64` count as no number.
pub fn extract_volume(text: &str) -> VolumeSignal {
    let lower = text.to_lowercase();

    let parsed_number = NUMBER_PATTERN
        .find_iter(&lower)
        .last()
        .and_then(|m| parse_grouped(m.as_str()));

    VolumeSignal {
        parsed_number,
        high_volume_keyword_present: HIGH_VOLUME_PATTERN.is_match(&lower),
    }
}

fn parse_grouped(token: &str) -> Option<u64> {
    let digits: String = token.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
