// SPDX-FileCopyrightText: 2026 ARIA-SDR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the FAQ knowledge base.
//!
//! Posts `{"question", "k", "filter_source"}` to the configured endpoint and
//! reads the `context` string out of the JSON reply. Transient statuses
//! (429, 500, 502, 503, 504) are retried once.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use aria_core::{AriaError, KnowledgeSource};

/// Pause before the single retry.
const RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    question: &'a str,
    k: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter_source: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    context: Option<String>,
}

/// Knowledge source backed by a retrieval HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpKnowledgeClient {
    client: reqwest::Client,
    endpoint: String,
    top_k: u32,
    filter_source: Option<String>,
    timeout: Duration,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpKnowledgeClient {
    /// Builds a client with a per-request `timeout`.
    pub fn new(
        endpoint: impl Into<String>,
        top_k: u32,
        filter_source: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AriaError> {
        let endpoint = endpoint.into();
        let url = reqwest::Url::parse(&endpoint)
            .map_err(|e| AriaError::Config(format!("invalid knowledge endpoint `{endpoint}`: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AriaError::Config(format!(
                "knowledge endpoint `{endpoint}` must use http or https"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AriaError::Knowledge {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint,
            top_k,
            filter_source,
            timeout,
            max_retries: 1,
            retry_delay: RETRY_DELAY,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[cfg(test)]
    fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    async fn query(&self, question: &str) -> Result<Option<String>, AriaError> {
        let body = QueryRequest {
            question,
            k: self.top_k,
            filter_source: self.filter_source.as_deref(),
        };

        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying knowledge query after transient error");
                tokio::time::sleep(self.retry_delay).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .json(&body)
                .send()
                .await
                .map_err(|e| self.transport_error(e))?;

            let status = response.status();
            debug!(status = %status, attempt, "knowledge response received");

            if status.is_success() {
                let parsed: QueryResponse =
                    response.json().await.map_err(|e| AriaError::Knowledge {
                        message: format!("failed to parse knowledge response: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                return Ok(parsed.context.filter(|c| !c.trim().is_empty()));
            }

            let text = response.text().await.unwrap_or_default();
            let error = AriaError::Knowledge {
                message: format!("knowledge endpoint returned {status}: {text}"),
                source: None,
            };
            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, "transient knowledge error, will retry");
                last_error = Some(error);
                continue;
            }
            return Err(error);
        }

        Err(last_error.unwrap_or_else(|| AriaError::Knowledge {
            message: "knowledge query failed after retries".into(),
            source: None,
        }))
    }

    fn transport_error(&self, e: reqwest::Error) -> AriaError {
        if e.is_timeout() {
            AriaError::Timeout {
                duration: self.timeout,
            }
        } else {
            AriaError::Knowledge {
                message: format!("knowledge request failed: {e}"),
                source: Some(Box::new(e)),
            }
        }
    }
}

#[async_trait]
impl KnowledgeSource for HttpKnowledgeClient {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_context(&self, question: &str) -> Result<Option<String>, AriaError> {
        self.query(question).await
    }
}

fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> HttpKnowledgeClient {
        HttpKnowledgeClient::new(
            format!("{}/rag/query", server.uri()),
            5,
            Some("faq".into()),
            Duration::from_secs(2),
        )
        .unwrap()
        .with_retry_delay(Duration::from_millis(10))
    }

    #[test]
    fn rejects_unusable_endpoint() {
        for endpoint in ["not a url", "ftp://kb.local/rag/query"] {
            let err = HttpKnowledgeClient::new(endpoint, 5, None, Duration::from_secs(1))
                .unwrap_err();
            assert!(matches!(err, AriaError::Config(_)), "got: {err:?}");
        }
    }

    #[tokio::test]
    async fn fetches_context() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rag/query"))
            .and(body_json(serde_json::json!({
                "question": "como funciona?",
                "k": 5,
                "filter_source": "faq"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"context": "Planos a partir de 50 envios."})),
            )
            .mount(&server)
            .await;

        let context = test_client(&server)
            .fetch_context("como funciona?")
            .await
            .unwrap();
        assert_eq!(context.as_deref(), Some("Planos a partir de 50 envios."));
    }

    #[tokio::test]
    async fn blank_or_missing_context_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"context": "  "})))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"hits": []})))
            .mount(&server)
            .await;

        let client = test_client(&server);
        assert_eq!(client.fetch_context("qual o prazo?").await.unwrap(), None);
        assert_eq!(client.fetch_context("qual o prazo?").await.unwrap(), None);
    }

    #[tokio::test]
    async fn omits_filter_source_when_unset() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(serde_json::json!({"question": "preço", "k": 3})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"context": "ok"})))
            .mount(&server)
            .await;

        let client = HttpKnowledgeClient::new(
            format!("{}/rag/query", server.uri()),
            3,
            None,
            Duration::from_secs(2),
        )
        .unwrap();
        assert_eq!(client.fetch_context("preço").await.unwrap().as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn retries_once_on_503() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"context": "after retry"})))
            .mount(&server)
            .await;

        let context = test_client(&server).fetch_context("preço").await.unwrap();
        assert_eq!(context.as_deref(), Some("after retry"));
    }

    #[tokio::test]
    async fn gives_up_after_second_transient_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let err = test_client(&server).fetch_context("preço").await.unwrap_err();
        assert!(err.to_string().contains("500"), "got: {err}");
    }

    #[tokio::test]
    async fn does_not_retry_client_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server).fetch_context("preço").await.unwrap_err();
        assert!(matches!(err, AriaError::Knowledge { .. }));
    }

    #[tokio::test]
    async fn slow_endpoint_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"context": "late"}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = HttpKnowledgeClient::new(
            format!("{}/rag/query", server.uri()),
            5,
            None,
            Duration::from_millis(200),
        )
        .unwrap();
        let err = client.fetch_context("preço").await.unwrap_err();
        assert!(matches!(err, AriaError::Timeout { .. }), "got: {err:?}");
    }
}
