// SPDX-FileCopyrightText: 2026 ARIA-SDR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `aria serve` command implementation.
//!
//! Wires the validated configuration into the gateway: bearer auth, the
//! routing classifier and, when enabled, the HTTP knowledge client.

use std::sync::Arc;
use std::time::Duration;

use aria_config::model::{AriaConfig, KnowledgeConfig};
use aria_core::{AriaError, KnowledgeSource};
use aria_gateway::auth::AuthConfig;
use aria_gateway::{start_server, GatewayState, HttpKnowledgeClient, ServerConfig};
use aria_router::RoutingClassifier;
use tracing::{debug, info, warn};

/// Run the gateway until the process is stopped.
pub async fn run_serve(config: AriaConfig) -> Result<(), AriaError> {
    init_tracing(&config.agent.log_level);

    info!(agent = config.agent.name.as_str(), "starting aria serve");

    if config.gateway.bearer_token.is_none() {
        warn!(
            "gateway.bearer_token is not set; /assist/routing will reject every request. \
             Set gateway.bearer_token or ARIA_GATEWAY_BEARER_TOKEN."
        );
    }

    let state = GatewayState {
        classifier: RoutingClassifier::new(),
        knowledge: build_knowledge(&config.knowledge)?,
        auth: AuthConfig {
            bearer_token: config.gateway.bearer_token.clone(),
        },
    };

    let server = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };

    tokio::select! {
        result = start_server(&server, state) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
            Ok(())
        }
    }
}

/// The knowledge client, or `None` when retrieval is disabled.
fn build_knowledge(
    config: &KnowledgeConfig,
) -> Result<Option<Arc<dyn KnowledgeSource>>, AriaError> {
    if !config.enabled {
        debug!("knowledge retrieval disabled by configuration");
        return Ok(None);
    }

    let client = HttpKnowledgeClient::new(
        config.endpoint.clone(),
        config.top_k,
        config.default_source.clone(),
        Duration::from_secs(config.timeout_secs),
    )?;
    info!(endpoint = client.endpoint(), "knowledge retrieval enabled");
    Ok(Some(Arc::new(client)))
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("aria={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
