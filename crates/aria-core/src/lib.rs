// SPDX-FileCopyrightText: 2026 ARIA-SDR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the ARIA-SDR assistant.
//!
//! This crate provides the error type, the routing enums and the
//! knowledge-source trait used throughout the workspace.

pub mod error;
pub mod traits;
pub mod types;

pub use error::AriaError;
pub use traits::KnowledgeSource;
pub use types::{NextAction, Route, Variables, VolumeClass};
