// SPDX-FileCopyrightText: 2026 ARIA-SDR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use aria_core::{AriaError, KnowledgeSource};
use aria_router::RoutingClassifier;

use crate::auth::{auth_middleware, AuthConfig};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub classifier: RoutingClassifier,
    /// Knowledge base used for FAQ enrichment; `None` disables it.
    pub knowledge: Option<Arc<dyn KnowledgeSource>>,
    pub auth: AuthConfig,
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("knowledge", &self.knowledge.as_ref().map(|k| k.name()))
            .field("auth", &self.auth)
            .finish()
    }
}

/// Address the gateway binds to.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Build the gateway router.
///
/// - GET /healthz (public)
/// - POST /assist/routing (bearer auth)
pub fn router(state: GatewayState) -> Router {
    let public_routes = Router::new().route("/healthz", get(handlers::get_healthz));

    let api_routes = Router::new()
        .route("/assist/routing", post(handlers::post_assist_routing))
        .route_layer(axum_middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind to `host:port` and serve until the process is stopped.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), AriaError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AriaError::Gateway {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| AriaError::Gateway {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const TOKEN: &str = "test-token";

    struct StaticKnowledge(Option<&'static str>);

    #[async_trait]
    impl KnowledgeSource for StaticKnowledge {
        fn name(&self) -> &str {
            "static"
        }

        async fn fetch_context(&self, _question: &str) -> Result<Option<String>, AriaError> {
            Ok(self.0.map(str::to_string))
        }
    }

    struct BrokenKnowledge;

    #[async_trait]
    impl KnowledgeSource for BrokenKnowledge {
        fn name(&self) -> &str {
            "broken"
        }

        async fn fetch_context(&self, _question: &str) -> Result<Option<String>, AriaError> {
            Err(AriaError::Knowledge {
                message: "connection refused".into(),
                source: None,
            })
        }
    }

    fn state(knowledge: Option<Arc<dyn KnowledgeSource>>) -> GatewayState {
        GatewayState {
            classifier: RoutingClassifier::new(),
            knowledge,
            auth: AuthConfig {
                bearer_token: Some(TOKEN.to_string()),
            },
        }
    }

    fn assist() -> axum::http::request::Builder {
        Request::builder()
            .method("POST")
            .uri("/assist/routing")
            .header("authorization", format!("Bearer {TOKEN}"))
            .header("content-type", "application/json")
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn post_json(app: Router, body: Value) -> (StatusCode, Value) {
        let request = assist().body(Body::from(body.to_string())).unwrap();
        send(app, request).await
    }

    #[tokio::test]
    async fn healthz_is_public() {
        let request = Request::builder().uri("/healthz").body(Body::empty()).unwrap();
        let (status, body) = send(router(state(None)), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"ok": true}));
    }

    #[tokio::test]
    async fn routing_requires_token() {
        let request = Request::builder()
            .method("POST")
            .uri("/assist/routing")
            .body(Body::from("{}"))
            .unwrap();
        let (status, body) = send(router(state(None)), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "missing_authorization");

        let request = Request::builder()
            .method("POST")
            .uri("/assist/routing")
            .header("authorization", "Bearer wrong")
            .body(Body::from("{}"))
            .unwrap();
        let (status, body) = send(router(state(None)), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "invalid_token");
    }

    #[tokio::test]
    async fn unconfigured_token_fails_closed() {
        let mut unconfigured = state(None);
        unconfigured.auth = AuthConfig::default();
        let request = assist().body(Body::from("{}")).unwrap();
        let (status, body) = send(router(unconfigured), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "auth_not_configured");
    }

    #[tokio::test]
    async fn high_volume_sending_schedules() {
        let (status, body) = post_json(
            router(state(None)),
            json!({"input": "Quero enviar 1.500 mensagens por mês", "thread_id": "t-1"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["route"], "envio");
        assert_eq!(body["next_action"], "schedule");
        assert_eq!(body["volume_class"], "alto");
        assert_eq!(body["volume_alto"], true);
        assert_eq!(body["confidence"], 0.75);
        assert_eq!(body["thread_id"], "t-1");
        assert_eq!(body["variables"]["volume_num"], "1500");
        assert_eq!(body["variables"]["thread_id"], "t-1");
        assert_eq!(body["tags"], json!([]));
        assert_eq!(body["reply_text"], crate::reply::SCHEDULE_REPLY);
    }

    #[tokio::test]
    async fn variables_are_coerced_and_override_applies() {
        let (status, body) = post_json(
            router(state(None)),
            json!({
                "message": "recebi um e-mail",
                "variables": {"fluxo_path": "envio", "lead_volumetria": 300}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["route"], "envio");
        assert_eq!(body["fluxo_path"], "envio");
        assert_eq!(body["next_action"], "buy_credits");
        assert_eq!(body["variables"]["lead_volumetria"], "300");
    }

    #[tokio::test]
    async fn empty_body_greets() {
        let request = assist().body(Body::empty()).unwrap();
        let (status, body) = send(router(state(None)), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply_text"], crate::reply::GREETING_REPLY);
        assert!(body.get("route").is_none());
        assert!(body.get("confidence").is_none());
        assert!(body["thread_id"].as_str().unwrap().starts_with("thr_"));
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let request = assist().body(Body::from("{oops")).unwrap();
        let (status, body) = send(router(state(None)), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"detail": "invalid_json"}));
    }

    #[tokio::test]
    async fn array_body_is_400() {
        let request = assist()
            .body(Body::from(r#"["quero enviar 5000"]"#))
            .unwrap();
        let (status, body) = send(router(state(None)), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"detail": "invalid_json"}));
    }

    #[tokio::test]
    async fn lower_case_bearer_scheme_is_accepted() {
        let request = Request::builder()
            .method("POST")
            .uri("/assist/routing")
            .header("authorization", format!("bearer {TOKEN}"))
            .body(Body::from("{}"))
            .unwrap();
        let (status, _) = send(router(state(None)), request).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn numeric_thread_id_is_kept() {
        let (_, body) = post_json(
            router(state(None)),
            json!({"input": "oi", "thread_id": 123}),
        )
        .await;
        assert_eq!(body["thread_id"], "123");
    }

    #[tokio::test]
    async fn fluxo_path_is_trimmed_and_blank_omitted() {
        let (_, body) = post_json(
            router(state(None)),
            json!({"input": "quero enviar", "variables": {"fluxo_path": "  envio "}}),
        )
        .await;
        assert_eq!(body["fluxo_path"], "envio");

        let (_, body) = post_json(
            router(state(None)),
            json!({"input": "oi", "variables": {"fluxo_path": "   "}}),
        )
        .await;
        assert!(body.get("fluxo_path").is_none());
    }

    #[tokio::test]
    async fn thread_header_and_trace_id() {
        let request = assist()
            .header("x-thread-id", "hdr-thread")
            .header("x-request-id", "req-9")
            .body(Body::from(json!({"input": "oi", "thread_id": "body"}).to_string()))
            .unwrap();
        let (_, body) = send(router(state(None)), request).await;
        assert_eq!(body["thread_id"], "hdr-thread");
        assert_eq!(body["trace_id"], "req-9");
    }

    #[tokio::test]
    async fn sender_and_channel_derive_thread() {
        let (_, body) = post_json(
            router(state(None)),
            json!({"input": "oi", "variables": {"remetente": "5511999990000", "canal": "whatsapp"}}),
        )
        .await;
        assert_eq!(
            body["thread_id"],
            crate::thread::derive_thread_id("5511999990000", "whatsapp")
        );
    }

    #[tokio::test]
    async fn knowledge_context_is_attached() {
        let knowledge: Arc<dyn KnowledgeSource> =
            Arc::new(StaticKnowledge(Some("Prazo de entrega: imediato.")));
        let (_, body) = post_json(
            router(state(Some(knowledge))),
            json!({"input": "qual o prazo de entrega?"}),
        )
        .await;
        assert_eq!(body["route"], "faq");
        assert_eq!(body["reply_text"], crate::reply::CONTEXT_REPLY);
        assert_eq!(body["variables"]["need_rag"], "true");
        assert_eq!(body["variables"]["rag_context"], "Prazo de entrega: imediato.");
    }

    #[tokio::test]
    async fn knowledge_skipped_for_non_questions() {
        let knowledge: Arc<dyn KnowledgeSource> = Arc::new(StaticKnowledge(Some("unused")));
        let (_, body) = post_json(
            router(state(Some(knowledge))),
            json!({"input": "quero enviar 50"}),
        )
        .await;
        assert!(body["variables"].get("need_rag").is_none());
        assert_eq!(body["reply_text"], crate::reply::BUY_CREDITS_REPLY);
    }

    #[tokio::test]
    async fn knowledge_failure_degrades() {
        let knowledge: Arc<dyn KnowledgeSource> = Arc::new(BrokenKnowledge);
        let (status, body) = post_json(
            router(state(Some(knowledge))),
            json!({"input": "como funciona?"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["variables"].get("rag_context").is_none());
        assert_eq!(body["reply_text"], crate::reply::GREETING_REPLY);
    }

    #[test]
    fn state_debug_hides_token() {
        let debug = format!("{:?}", state(None));
        assert!(!debug.contains(TOKEN));
    }
}
