//! LLM Provider implementations for Parley.
//!
//! All providers implement the `parley_core::Provider` trait.
//! [`build_from_config`] creates the one the binary uses.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use parley_config::AppConfig;
use parley_core::error::ProviderError;
use std::time::Duration;

/// Build the configured provider.
///
/// The caller is expected to have checked the secret with
/// [`AppConfig::require_api_key`] already; a missing key here only means
/// every request will fail authentication.
pub fn build_from_config(config: &AppConfig) -> Result<OpenAiCompatProvider, ProviderError> {
    OpenAiCompatProvider::new(
        &config.provider.name,
        &config.provider.base_url,
        config.api_key.clone().unwrap_or_default(),
        Duration::from_secs(config.provider.timeout_secs),
    )
}
