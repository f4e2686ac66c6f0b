// SPDX-FileCopyrightText: 2026 ARIA-SDR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge-base lookup trait.

use async_trait::async_trait;

use crate::error::AriaError;

/// A source of FAQ context for a user question.
///
/// Callers treat every error as "no context": the knowledge base is an
/// enrichment and must never fail a conversation turn.
#[async_trait]
pub trait KnowledgeSource: Send + Sync + 'static {
    /// Human-readable name used in logs.
    fn name(&self) -> &str;

    /// Fetches context for `question`. `Ok(None)` means nothing relevant.
    async fn fetch_context(&self, question: &str) -> Result<Option<String>, AriaError>;
}
