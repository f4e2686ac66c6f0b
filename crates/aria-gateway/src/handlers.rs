// SPDX-FileCopyrightText: 2026 ARIA-SDR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway.
//!
//! Handles POST /assist/routing and GET /healthz.

use std::time::Instant;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use aria_core::Variables;
use aria_router::classifier::{FLUXO_PATH, VOLUME_NUM};
use aria_router::wants_knowledge;

use crate::reply::compose_reply;
use crate::server::GatewayState;
use crate::thread::resolve_thread_id;

/// Output variable set when knowledge context was attached.
pub const NEED_RAG: &str = "need_rag";
/// Output variable holding the fetched knowledge context.
pub const RAG_CONTEXT: &str = "rag_context";
/// Output variable echoing the resolved thread id.
pub const THREAD_ID: &str = "thread_id";

/// Confidence reported whenever a route was decided.
const ROUTED_CONFIDENCE: f64 = 0.75;

/// Request body for POST /assist/routing.
///
/// Callers disagree on where the message lives, so `input`, `user_text` and
/// `message` are all accepted. Fields are kept as raw JSON and coerced later.
#[derive(Debug, Default, Deserialize)]
pub struct AssistRequest {
    #[serde(default)]
    pub input: Option<Value>,
    #[serde(default)]
    pub user_text: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub thread_id: Option<Value>,
    #[serde(default)]
    pub variables: Option<Value>,
    #[serde(default)]
    pub channel: Option<Value>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl AssistRequest {
    /// First non-empty text among `input`, `user_text`, `message`, trimmed.
    pub fn text(&self) -> String {
        [&self.input, &self.user_text, &self.message]
            .into_iter()
            .filter_map(|field| field.as_ref().and_then(value_to_string))
            .map(|text| text.trim().to_string())
            .find(|text| !text.is_empty())
            .unwrap_or_default()
    }

    /// The `variables` object with every value coerced to a string.
    pub fn variables(&self) -> Variables {
        match &self.variables {
            Some(Value::Object(map)) => coerce_variables(map),
            _ => Variables::new(),
        }
    }
}

/// Response body for POST /assist/routing.
#[derive(Debug, Serialize)]
pub struct AssistResponse {
    pub reply_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    pub thread_id: String,
    pub variables: Variables,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_action: Option<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_alto: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fluxo_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

/// Response body for GET /healthz.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    pub detail: String,
}

/// GET /healthz
pub async fn get_healthz() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// POST /assist/routing
///
/// Classifies one user turn, optionally attaches knowledge context and
/// answers with a templated reply plus the routing variables.
pub async fn post_assist_routing(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let started = Instant::now();

    let request = match parse_body(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(error = %e, "rejecting malformed routing request");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    detail: "invalid_json".to_string(),
                }),
            )
                .into_response();
        }
    };

    let user_text = request.text();
    let variables = request.variables();
    let body_thread_id = request.thread_id.as_ref().and_then(value_to_string);
    let thread_id = resolve_thread_id(
        header_str(&headers, "x-thread-id"),
        body_thread_id.as_deref(),
        &variables,
    );
    let trace_id = header_str(&headers, "x-trace-id")
        .or_else(|| header_str(&headers, "x-request-id"))
        .map(str::to_string);

    let mut output = state.classifier.classify(&user_text, &variables);

    let context = match &state.knowledge {
        Some(source) if wants_knowledge(&user_text, &variables) => {
            match source.fetch_context(&user_text).await {
                Ok(context) => context,
                Err(e) => {
                    tracing::warn!(source = source.name(), error = %e, "knowledge lookup failed");
                    None
                }
            }
        }
        _ => None,
    };
    if let Some(context) = &context {
        output
            .output_variables
            .insert(NEED_RAG.to_string(), "true".to_string());
        output
            .output_variables
            .insert(RAG_CONTEXT.to_string(), context.clone());
    }
    output
        .output_variables
        .insert(THREAD_ID.to_string(), thread_id.clone());

    let reply = compose_reply(&output, context.is_some());
    let volume_class = output.volume_class();
    let fluxo_path = variables
        .get(FLUXO_PATH)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    tracing::info!(
        event = "routing",
        thread_id = %thread_id,
        trace_id = trace_id.as_deref().unwrap_or(""),
        route = reply.route.as_deref().unwrap_or(""),
        volume = output.output_variables.get(VOLUME_NUM).map(String::as_str).unwrap_or(""),
        fluxo_path = fluxo_path.as_deref().unwrap_or(""),
        dur_ms = started.elapsed().as_millis() as u64,
    );

    let response = AssistResponse {
        reply_text: reply.text.to_string(),
        confidence: reply.route.as_ref().map(|_| ROUTED_CONFIDENCE),
        route: reply.route,
        thread_id,
        next_action: output.next_action.map(|a| a.to_string()),
        tags: Vec::new(),
        volume_class: volume_class.map(|c| c.to_string()),
        volume_alto: volume_class.map(|c| c.is_high()),
        fluxo_path,
        trace_id,
        variables: output.output_variables,
    };
    (StatusCode::OK, Json(response)).into_response()
}

/// An empty body is an empty request; anything else must be a JSON object.
fn parse_body(body: &[u8]) -> Result<AssistRequest, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(AssistRequest::default());
    }
    match serde_json::from_slice(body)? {
        object @ Value::Object(_) => serde_json::from_value(object),
        _ => Err(serde::de::Error::custom("request body must be a JSON object")),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Stringify a JSON value the way workflow engines expect; `null` is absent.
fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

fn coerce_variables(map: &Map<String, Value>) -> Variables {
    map.iter()
        .filter_map(|(key, value)| value_to_string(value).map(|v| (key.clone(), v)))
        .collect()
}
