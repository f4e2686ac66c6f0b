// SPDX-FileCopyrightText: 2026 ARIA-SDR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Route resolution and volume classification.
//!
//! Orchestrates a single conversation turn: explicit `fluxo_path` override >
//! receiving keywords > sending keywords. Only the sending route goes on to
//! volume classification.

use aria_core::{NextAction, Route, Variables, VolumeClass};
use serde::Serialize;
use tracing::debug;

use crate::volume::{extract_volume, VolumeSignal};

/// Monthly volume at or above which a lead is routed to sales.
pub const HIGH_VOLUME_THRESHOLD: u64 = 1200;

/// Explicit route override variable.
pub const FLUXO_PATH: &str = "fluxo_path";
/// Primary volume hint variable.
pub const LEAD_VOLUMETRIA: &str = "lead_volumetria";
/// Legacy volume hint, consulted only when `lead_volumetria` is absent.
pub const LEAD_DUVIDA: &str = "lead_duvida";
/// Output: parsed volume as a decimal string, or empty.
pub const VOLUME_NUM: &str = "volume_num";
/// Output: `"true"` / `"false"`.
pub const VOLUME_ALTO: &str = "volume_alto";
/// Output: `"alto"` / `"baixo"`.
pub const VOLUME_CLASS: &str = "volume_class";

/// Receiving keywords, checked first.
const RECEIVING_KEYWORDS: &[&str] = &[
    "recebi",
    "receb",
    "chegou",
    "abriu",
    "abertura",
    "confirmacao de leitura",
];

/// Sending keywords, checked after the receiving set.
const SENDING_KEYWORDS: &[&str] = &[
    "enviar",
    "envio",
    "mandar",
    "disparar",
    "disparo",
    "quero enviar",
];

/// A single classification request.
#[derive(Debug, Clone, Default)]
pub struct ClassificationInput {
    pub user_text: String,
    pub variables: Variables,
}

impl ClassificationInput {
    pub fn new(user_text: impl Into<String>, variables: Variables) -> Self {
        Self {
            user_text: user_text.into(),
            variables,
        }
    }

    /// Classify this input with the default classifier.
    pub fn classify(&self) -> ClassificationOutput {
        classify_route(&self.user_text, &self.variables)
    }
}

/// Result of classifying a conversation turn.
///
/// `next_action` is set if and only if `route` is [`Route::Sending`];
/// `output_variables` is empty for every other route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationOutput {
    pub route: Option<Route>,
    pub output_variables: Variables,
    pub next_action: Option<NextAction>,
    /// The signal the volume decision was based on (sending route only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<VolumeSignal>,
}

impl ClassificationOutput {
    /// The volume class, when one was decided.
    pub fn volume_class(&self) -> Option<VolumeClass> {
        self.next_action.map(|action| match action {
            NextAction::Schedule => VolumeClass::High,
            NextAction::BuyCredits => VolumeClass::Low,
        })
    }
}

/// Deterministic route classifier with zero cost and zero latency.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoutingClassifier;

impl RoutingClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify a user message plus its conversation variables.
    ///
    /// Total over its inputs: missing variables and unparsable text degrade
    /// to "no route" or "no number", never to an error.
    pub fn classify(&self, user_text: &str, variables: &Variables) -> ClassificationOutput {
        let Some(route) = Self::resolve_route(user_text, variables) else {
            debug!("no route detected");
            return ClassificationOutput::default();
        };

        if route != Route::Sending {
            debug!(route = %route, "route resolved");
            return ClassificationOutput {
                route: Some(route),
                ..ClassificationOutput::default()
            };
        }

        let source = Self::volume_source(user_text, variables).to_lowercase();
        let signal = extract_volume(&source);
        let class = Self::volume_class(&signal);
        let next_action = class.next_action();

        let number = signal.parsed_number.map(|n| n.to_string());
        let mut output_variables = Variables::new();
        output_variables.insert(VOLUME_NUM.to_string(), number.clone().unwrap_or_default());
        output_variables.insert(LEAD_VOLUMETRIA.to_string(), number.unwrap_or(source));
        output_variables.insert(VOLUME_ALTO.to_string(), class.is_high().to_string());
        output_variables.insert(VOLUME_CLASS.to_string(), class.to_string());

        debug!(
            route = %route,
            volume = ?signal.parsed_number,
            keyword = signal.high_volume_keyword_present,
            volume_class = %class,
            next_action = %next_action,
            "route and volume classified"
        );

        ClassificationOutput {
            route: Some(route),
            output_variables,
            next_action: Some(next_action),
            volume: Some(signal),
        }
    }

    /// Explicit override first, then keyword inference.
    fn resolve_route(user_text: &str, variables: &Variables) -> Option<Route> {
        let override_path = variables
            .get(FLUXO_PATH)
            .map(|v| v.trim().to_lowercase())
            .unwrap_or_default();
        match override_path.as_str() {
            "envio" => return Some(Route::Sending),
            "recebimento" => return Some(Route::Receiving),
            _ => {}
        }

        let lower = user_text.to_lowercase();
        if RECEIVING_KEYWORDS.iter().any(|k| lower.contains(k)) {
            Some(Route::Receiving)
        } else if SENDING_KEYWORDS.iter().any(|k| lower.contains(k)) {
            Some(Route::Sending)
        } else {
            None
        }
    }

    /// `lead_volumetria`, else `lead_duvida`, else the message itself.
    ///
    /// Only absence falls through: a present but empty `lead_volumetria`
    /// is used as is.
    fn volume_source<'a>(user_text: &'a str, variables: &'a Variables) -> &'a str {
        variables
            .get(LEAD_VOLUMETRIA)
            .or_else(|| variables.get(LEAD_DUVIDA))
            .map(String::as_str)
            .unwrap_or(user_text)
    }

    /// An explicit number decides alone; keywords only count without one.
    fn volume_class(signal: &VolumeSignal) -> VolumeClass {
        let is_high = match signal.parsed_number {
            Some(n) => n >= HIGH_VOLUME_THRESHOLD,
            None => signal.high_volume_keyword_present,
        };
        VolumeClass::from_high(is_high)
    }
}

/// Classify with a default [`RoutingClassifier`].
pub fn classify_route(user_text: &str, variables: &Variables) -> ClassificationOutput {
    RoutingClassifier::new().classify(user_text, variables)
}
