use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, Method};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::commands::api;
use crate::config::{Config, GatewayConfig};
use crate::constants::{ALLOWED_REQUEST_HEADERS, DEFAULT_MAX_BODY_BYTES};
use crate::dispatcher::Dispatcher;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

impl AppState {
    pub fn new(gateway: GatewayConfig) -> Self {
        Self {
            dispatcher: Arc::new(Dispatcher::new(gateway)),
        }
    }
}

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(ALLOWED_REQUEST_HEADERS.map(HeaderName::from_static))
}

pub fn router(state: AppState) -> Router {
    router_with_limit(state, DEFAULT_MAX_BODY_BYTES)
}

pub fn router_with_limit(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", post(api::dispatch))
        .route("/api", post(api::dispatch))
        .route("/generate-image", post(api::generate_image))
        .route("/remove-background", post(api::remove_background))
        .route("/upscale", post(api::upscale))
        .route("/style-transfer", post(api::style_transfer))
        .route("/health", get(api::health))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

pub async fn serve(config: Config) -> Result<()> {
    let gateway = config.gateway();
    info!(
        gateway = %gateway.base_url,
        forwards_caller_key = gateway.api_key.is_none(),
        "starting image proxy"
    );

    let app = router_with_limit(AppState::new(gateway), config.max_body_bytes);
    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen))?;

    info!("listening on {}", config.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {err}");
    }
    info!("shutting down");
}
