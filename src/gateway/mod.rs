//! Axum proxy that holds the upstream key and forwards generation requests.
//!
//! Body size and request time are bounded; CORS allows any origin so local
//! previews can call it directly.

mod handlers;

use handlers::{handle_generate, handle_health};

use crate::config::GatewayConfig;
use crate::providers::transport::build_http_client;
use anyhow::Result;
use axum::{
    Router,
    http::{Method, StatusCode, header},
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Maximum request body size (1MB)
pub const MAX_BODY_SIZE: usize = 1_048_576;
/// Request timeout (120s), long enough for a slow upstream completion
pub const REQUEST_TIMEOUT_SECS: u64 = 120;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub upstream_base_url: Arc<str>,
    pub default_model: Arc<str>,
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            client: build_http_client(REQUEST_TIMEOUT_SECS),
            upstream_base_url: Arc::from(config.upstream_base_url.trim_end_matches('/')),
            default_model: Arc::from(config.default_model.as_str()),
            api_key: config
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(Arc::from),
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(handle_health))
        .route("/api/generate", post(handle_generate))
        .with_state(state)
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ))
}

/// Bind `host:port` and serve until the process stops.
pub async fn run_gateway(host: &str, port: u16, config: &GatewayConfig) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    run_gateway_with_listener(host, listener, config).await
}

/// Serve from a pre-bound listener.
pub async fn run_gateway_with_listener(
    host: &str,
    listener: tokio::net::TcpListener,
    config: &GatewayConfig,
) -> Result<()> {
    let actual_port = listener.local_addr()?.port();
    let state = AppState::from_config(config);

    println!("◆ Report proxy listening on {host}:{actual_port}");
    println!("  POST /api/generate → {}", state.upstream_base_url);
    println!("  GET  /health");
    if state.api_key.is_none() {
        println!("  ! GEMINI_API_KEY is not set; generate requests will fail");
        tracing::warn!("Gateway started without an upstream API key");
    }
    println!("  Press Ctrl+C to stop.\n");

    axum::serve(listener, build_app(state)).await?;
    Ok(())
}
