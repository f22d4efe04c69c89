//! HTTP API v1 — the JSON surface behind the chat page.
//!
//! Endpoints:
//!
//! - `GET    /v1/config`              — Page branding and default system prompt
//! - `GET    /v1/models`              — Model picker and window slider bounds
//! - `POST   /v1/sessions`            — Start a session
//! - `GET    /v1/sessions/{id}`       — Read a session's transcript
//! - `DELETE /v1/sessions/{id}`       — End a session
//! - `POST   /v1/sessions/{id}/chat`  — Ask a question

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use parley_core::error::{Error, ProviderError};
use parley_core::provider::Usage;
use parley_core::settings::{ChatSettings, ModelId, WindowSize};

use crate::SharedState;

// ── Router ────────────────────────────────────────────────────────────────

/// Build the v1 API router. Nest this under "/v1" in the main router.
pub fn v1_router(state: SharedState) -> Router {
    Router::new()
        .route("/config", get(config_handler))
        .route("/models", get(models_handler))
        .route("/sessions", post(create_session_handler))
        .route(
            "/sessions/{id}",
            get(get_session_handler).delete(delete_session_handler),
        )
        .route("/sessions/{id}/chat", post(chat_handler))
        .with_state(state)
}

// ── Request / Response types ──────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct PageConfigResponse {
    pub title: String,
    pub greeting: String,
    pub organization: String,
    pub website: String,
    pub default_system_prompt: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<String>,
    pub default_model: String,
    pub window: WindowBounds,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WindowBounds {
    pub min: usize,
    pub max: usize,
    pub default: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub id: String,
    pub created_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub id: String,
    pub turns: Vec<TurnDto>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TurnDto {
    pub human: String,
    pub assistant: String,
    pub created_at: String,
}

/// A question plus the control values at the moment it was asked.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub window_size: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// `None` when the message was empty and nothing was sent
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub history_turns: usize,
    pub transcript_len: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, kind: &str, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            kind: kind.into(),
        }),
    )
}

fn session_not_found(id: &str) -> ApiError {
    api_error(
        StatusCode::NOT_FOUND,
        "session_not_found",
        format!("No session '{id}'"),
    )
}

/// HTTP status for a provider failure.
fn provider_status(e: &ProviderError) -> StatusCode {
    match e {
        ProviderError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        ProviderError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl From<Error> for ErrorResponse {
    fn from(e: Error) -> Self {
        let kind = match &e {
            Error::Provider(p) => p.kind(),
            Error::InvalidSettings(_) => "invalid_settings",
        };
        Self {
            error: e.to_string(),
            kind: kind.into(),
        }
    }
}

fn to_api_error(e: Error) -> ApiError {
    let status = match &e {
        Error::Provider(p) => provider_status(p),
        Error::InvalidSettings(_) => StatusCode::BAD_REQUEST,
    };
    (status, Json(ErrorResponse::from(e)))
}

impl ChatRequest {
    /// Snapshot the settings for this request, filling gaps from defaults.
    fn settings(&self, defaults: &ChatSettings) -> Result<ChatSettings, Error> {
        let model = match &self.model {
            Some(m) => m.parse::<ModelId>()?,
            None => defaults.model,
        };
        let window_size = match self.window_size {
            Some(k) => WindowSize::new(k)?,
            None => defaults.window_size,
        };
        let system_prompt = self
            .system_prompt
            .clone()
            .unwrap_or_else(|| defaults.system_prompt.clone());

        Ok(ChatSettings::new(system_prompt, model, window_size))
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn config_handler(State(state): State<SharedState>) -> Json<PageConfigResponse> {
    let branding = &state.branding;
    Json(PageConfigResponse {
        title: branding.title.clone(),
        greeting: branding.greeting.clone(),
        organization: branding.organization.clone(),
        website: branding.website.clone(),
        default_system_prompt: state.defaults.system_prompt.clone(),
    })
}

async fn models_handler(State(state): State<SharedState>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: ModelId::ALL.iter().map(|m| m.as_str().to_string()).collect(),
        default_model: state.defaults.model.as_str().to_string(),
        window: WindowBounds {
            min: WindowSize::MIN,
            max: WindowSize::MAX,
            default: state.defaults.window_size.get(),
        },
    })
}

async fn create_session_handler(
    State(state): State<SharedState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let (id, created_at) = state.sessions.create().await;
    info!(session_id = %id, "Session started");

    (
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            id: id.to_string(),
            created_at: created_at.to_rfc3339(),
        }),
    )
}

/// Returns the transcript as of the last completed turn; a question still
/// waiting on the provider is not included.
async fn get_session_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, ApiError> {
    let handle = state.sessions.get(&id).await.ok_or_else(|| session_not_found(&id))?;
    let session = handle.snapshot().await;

    Ok(Json(SessionResponse {
        id: session.id().to_string(),
        turns: session
            .transcript()
            .turns()
            .iter()
            .map(|t| TurnDto {
                human: t.human().to_string(),
                assistant: t.assistant().to_string(),
                created_at: t.created_at().to_rfc3339(),
            })
            .collect(),
        created_at: session.created_at().to_rfc3339(),
        updated_at: session.updated_at().to_rfc3339(),
    }))
}

async fn delete_session_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(&id).await {
        info!(session_id = %id, "Session ended");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(&id))
    }
}

async fn chat_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    // Settings are fixed before the session is touched.
    let settings = payload.settings(&state.defaults).map_err(to_api_error)?;

    let handle = state.sessions.get(&id).await.ok_or_else(|| session_not_found(&id))?;

    // Held across the provider call: the next question on this session queues.
    let _turn = handle.begin_turn().await;
    let mut session = handle.snapshot().await;

    match state.engine.respond(&mut session, &settings, &payload.message).await {
        Ok(Some(exchange)) => {
            let transcript_len = session.transcript().len();
            handle.commit(session).await;
            Ok(Json(ChatResponse {
                response: Some(exchange.turn.assistant().to_string()),
                model: Some(exchange.model),
                history_turns: exchange.history_turns,
                transcript_len,
                usage: exchange.usage,
            }))
        }
        Ok(None) => Ok(Json(ChatResponse {
            response: None,
            model: None,
            history_turns: 0,
            transcript_len: session.transcript().len(),
            usage: None,
        })),
        Err(e) => {
            error!(session_id = %id, error = %e, "Chat request failed");
            Err(to_api_error(e))
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
