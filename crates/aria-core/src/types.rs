// SPDX-FileCopyrightText: 2026 ARIA-SDR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared between the router, the gateway and the CLI.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Conversation variables keyed by name.
///
/// Ordered so serialized output is stable across calls.
pub type Variables = BTreeMap<String, String>;

/// Coarse conversational intent.
///
/// The string forms are the values accepted by the `fluxo_path` override.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum Route {
    /// The user wants to send bulk messages.
    #[strum(serialize = "envio")]
    #[serde(rename = "envio")]
    Sending,
    /// The user has a question about a message they received.
    #[strum(serialize = "recebimento")]
    #[serde(rename = "recebimento")]
    Receiving,
}

/// Downstream business action recommended for the sending route.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    /// Book a call with the sales team (high volume).
    Schedule,
    /// Direct the user to self-serve credit purchase (low volume).
    BuyCredits,
}

/// Monthly volume bucket.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum VolumeClass {
    #[strum(serialize = "alto")]
    #[serde(rename = "alto")]
    High,
    #[strum(serialize = "baixo")]
    #[serde(rename = "baixo")]
    Low,
}

impl VolumeClass {
    /// Bucket for a high/low decision.
    pub fn from_high(is_high: bool) -> Self {
        if is_high { Self::High } else { Self::Low }
    }

    pub fn is_high(self) -> bool {
        matches!(self, Self::High)
    }

    /// The action that goes with this bucket.
    pub fn next_action(self) -> NextAction {
        match self {
            Self::High => NextAction::Schedule,
            Self::Low => NextAction::BuyCredits,
        }
    }
}
