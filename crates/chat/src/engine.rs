//! The chat engine implementation.

use std::sync::Arc;

use parley_config::AppConfig;
use parley_core::history::rehydrate;
use parley_core::message::Turn;
use parley_core::prompt;
use parley_core::provider::{Provider, ProviderRequest};
use parley_core::session::{Exchange, Session};
use parley_core::settings::ChatSettings;
use parley_core::Result;
use tracing::{debug, info, warn};

/// Runs one exchange against a provider on behalf of a session.
///
/// Holds no conversation state: everything per-user lives in the
/// [`Session`] passed to [`respond`](ChatEngine::respond).
pub struct ChatEngine {
    /// The LLM provider to use
    provider: Arc<dyn Provider>,

    /// Temperature setting
    temperature: f32,

    /// Default max tokens per response
    max_tokens: Option<u32>,
}

impl ChatEngine {
    /// Create a new engine.
    pub fn new(provider: Arc<dyn Provider>, temperature: f32) -> Self {
        Self {
            provider,
            temperature,
            max_tokens: None,
        }
    }

    /// Create an engine with the generation options from config.
    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        let engine = Self::new(provider, config.provider.temperature);
        match config.provider.max_tokens {
            Some(max) => engine.with_max_tokens(max),
            None => engine,
        }
    }

    /// Set the default max tokens per LLM response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Ask one question in `session` using the `settings` snapshot.
    ///
    /// Returns `Ok(None)` without contacting the provider when `input` is
    /// empty. On a provider failure the error is returned and the
    /// transcript is left exactly as it was.
    pub async fn respond(
        &self,
        session: &mut Session,
        settings: &ChatSettings,
        input: &str,
    ) -> Result<Option<Exchange>> {
        if input.is_empty() {
            debug!(session_id = %session.id(), "Empty input, nothing sent");
            return Ok(None);
        }

        let window = rehydrate(session.transcript(), settings.window_size.get());
        let history_turns = window.len();
        let messages = prompt::build(&settings.system_prompt, &window, input);

        info!(
            session_id = %session.id(),
            model = %settings.model,
            history_turns,
            input_len = input.len(),
            "Sending question to provider"
        );

        let request = ProviderRequest::new(settings.model.as_str(), messages)
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        let response = match self.provider.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    session_id = %session.id(),
                    kind = e.kind(),
                    "Provider failed, transcript unchanged: {e}"
                );
                return Err(e.into());
            }
        };

        let turn = Turn::new(input, response.message.content);
        session.record(turn.clone());

        debug!(
            session_id = %session.id(),
            transcript_len = session.transcript().len(),
            reply_len = turn.assistant().len(),
            "Turn recorded"
        );

        Ok(Some(Exchange {
            turn,
            model: response.model,
            history_turns,
            usage: response.usage,
        }))
    }
}
