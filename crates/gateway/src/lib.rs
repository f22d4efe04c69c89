//! HTTP gateway for Parley.
//!
//! Serves the chat page and the v1 JSON API it talks to. Every browser tab
//! gets its own session; the transcripts live only in this process.
//!
//! Built on Axum.

pub mod api_v1;
pub mod frontend;
pub mod sessions;

#[cfg(test)]
mod test_helpers;

use axum::extract::DefaultBodyLimit;
use axum::{Router, response::Json, routing::get};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use parley_chat::ChatEngine;
use parley_config::{AppConfig, BrandingConfig};
use parley_core::provider::Provider;
use parley_core::settings::ChatSettings;

use sessions::SessionStore;

/// Shared application state for the gateway.
pub struct AppState {
    pub engine: ChatEngine,
    /// Control values used when a request leaves one out
    pub defaults: ChatSettings,
    pub branding: BrandingConfig,
    pub sessions: SessionStore,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Assemble state around an already-built provider.
    pub fn with_provider(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        Self {
            engine: ChatEngine::from_config(provider, config),
            defaults: config.chat.default_settings(),
            branding: config.branding.clone(),
            sessions: SessionStore::new(config.gateway.max_sessions),
        }
    }
}

/// Build the full router: health, v1 API, and the embedded page.
///
/// Layers applied:
/// - Request body size limit (1 MB)
/// - HTTP trace logging
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/v1", api_v1::v1_router(state))
        .merge(frontend::frontend_router())
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
///
/// Refuses to start without an API key.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.require_api_key()?;

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let provider = Arc::new(parley_providers::build_from_config(&config)?);
    let state = Arc::new(AppState::with_provider(provider, &config));
    let app = build_router(state);

    info!(
        addr = %addr,
        provider = %config.provider.name,
        default_model = %config.chat.default_model,
        "Gateway starting"
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
    }
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
