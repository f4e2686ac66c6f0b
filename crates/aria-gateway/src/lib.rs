// SPDX-FileCopyrightText: 2026 ARIA-SDR Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the ARIA-SDR assistant.
//!
//! Chat channels and workflow engines post each user turn to
//! `/assist/routing`. The gateway runs the deterministic router, optionally
//! pulls FAQ context from the knowledge base, derives a stable thread id and
//! answers with a templated reply plus the routing variables.

pub mod auth;
pub mod handlers;
pub mod knowledge;
pub mod reply;
pub mod server;
pub mod thread;

pub use knowledge::HttpKnowledgeClient;
pub use server::{router, start_server, GatewayState, ServerConfig};
