// SPDX-FileCopyrightText: 2026 ARIA-SDR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seams for external collaborators.
//!
//! Implementations are constructed once at startup and handed to request
//! handlers explicitly; nothing here is a process-wide singleton.

pub mod knowledge;

pub use knowledge::KnowledgeSource;
