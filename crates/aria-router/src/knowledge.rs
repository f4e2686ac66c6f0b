// SPDX-FileCopyrightText: 2026 ARIA-SDR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic for when a message should be answered from the FAQ knowledge base.

use aria_core::Variables;

/// Variable that forces knowledge lookup when set to `"true"`.
pub const FAQ_MODE: &str = "faq_mode";

/// Question patterns (contains, case-insensitive).
const QUESTION_PATTERNS: &[&str] = &[
    "como",
    "funciona",
    "preço",
    "prazo",
    "o que é",
    "qual",
    "como faço",
];

/// Whether `user_text` looks like a product question worth enriching with FAQ context.
pub fn wants_knowledge(user_text: &str, variables: &Variables) -> bool {
    let forced = variables
        .get(FAQ_MODE)
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));
    if forced {
        return true;
    }

    let lower = user_text.to_lowercase();
    QUESTION_PATTERNS.iter().any(|p| lower.contains(p))
}
