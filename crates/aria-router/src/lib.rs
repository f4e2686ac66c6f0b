// SPDX-FileCopyrightText: 2026 ARIA-SDR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation routing and volume classification for ARIA-SDR.
//!
//! This crate provides:
//! - [`extract_volume`]: pulls a monthly message count and a high-volume
//!   keyword signal out of free text
//! - [`RoutingClassifier`]: decides between the sending and receiving routes
//!   and, for sending, picks the volume class and next action
//! - [`wants_knowledge`]: decides whether a question should be enriched
//!   with FAQ context
//!
//! Everything here is pure and synchronous. No network, no shared state.

pub mod classifier;
pub mod knowledge;
pub mod volume;

pub use classifier::{
    classify_route, ClassificationInput, ClassificationOutput, RoutingClassifier,
    HIGH_VOLUME_THRESHOLD,
};
pub use knowledge::{wants_knowledge, FAQ_MODE};
pub use volume::{extract_volume, VolumeSignal};
