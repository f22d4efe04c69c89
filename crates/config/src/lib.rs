//! Configuration loading, validation, and management for Parley.
//!
//! Loads configuration from `~/.parley/config.toml` (or `$PARLEY_CONFIG`),
//! after pulling a `.env` file from the working directory into the
//! environment. Environment variables override the file. Validates all
//! settings at startup.

use parley_core::settings::{ChatSettings, ModelId, WindowSize};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variables consulted for the provider secret, in priority order.
pub const API_KEY_VARS: [&str; 2] = ["PARLEY_API_KEY", "GROQ_API_KEY"];

/// The root configuration structure.
///
/// Maps directly to `~/.parley/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Provider API key. Usually supplied through the environment instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Inference endpoint settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Defaults for the chat controls
    #[serde(default)]
    pub chat: ChatConfig,

    /// HTTP server settings
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Text shown by the web page
    #[serde(default)]
    pub branding: BrandingConfig,
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("chat", &self.chat)
            .field("gateway", &self.gateway)
            .field("branding", &self.branding)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Name used in logs
    #[serde(default = "default_provider_name")]
    pub name: String,

    /// Base URL of an OpenAI-compatible API (without `/chat/completions`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Upper bound on a single completion request
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_provider_name() -> String {
    "groq".into()
}
fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_temperature() -> f32 {
    0.7
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            temperature: default_temperature(),
            max_tokens: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default)]
    pub default_model: ModelId,

    #[serde(default)]
    pub default_window_size: WindowSize,

    #[serde(default)]
    pub default_system_prompt: String,
}

impl ChatConfig {
    /// The settings a request gets when it supplies none of its own.
    pub fn default_settings(&self) -> ChatSettings {
        ChatSettings::new(
            self.default_system_prompt.clone(),
            self.default_model,
            self.default_window_size,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Sessions kept in memory; creating one past this evicts the earliest created
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,
}

fn default_port() -> u16 {
    8501
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_max_sessions() -> usize {
    1_000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            max_sessions: default_max_sessions(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandingConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_greeting")]
    pub greeting: String,

    #[serde(default = "default_organization")]
    pub organization: String,

    #[serde(default = "default_website")]
    pub website: String,
}

fn default_title() -> String {
    "SFH AI Chatbot".into()
}
fn default_greeting() -> String {
    "Hello! I'm your friendly SFH AI chatbot. Let's start our conversation!".into()
}
fn default_organization() -> String {
    "Society for Family Health (SFH) - Rwanda".into()
}
fn default_website() -> String {
    "http://www.sfhrwanda.org/".into()
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            greeting: default_greeting(),
            organization: default_organization(),
            website: default_website(),
        }
    }
}

impl AppConfig {
    /// Load configuration the way the binary does at startup.
    ///
    /// Order: `.env` into the process environment, then the TOML file
    /// (`$PARLEY_CONFIG` or `~/.parley/config.toml`), then environment
    /// overrides:
    /// - `PARLEY_API_KEY`, `GROQ_API_KEY` (only when the file has no key)
    /// - `PARLEY_MODEL`
    /// - `PARLEY_BASE_URL`
    pub fn load() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("Ignoring unreadable .env file: {e}"),
        }

        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.api_key.is_none() {
            self.api_key = API_KEY_VARS
                .iter()
                .filter_map(|var| lookup(*var))
                .find(|key| !key.trim().is_empty());
        }

        if let Some(model) = lookup("PARLEY_MODEL") {
            self.chat.default_model = model
                .parse()
                .map_err(|e| ConfigError::ValidationError(format!("PARLEY_MODEL: {e}")))?;
        }

        if let Some(url) = lookup("PARLEY_BASE_URL") {
            self.provider.base_url = url;
        }

        self.validate()
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".parley")
    }

    /// The config file `load` reads: `$PARLEY_CONFIG`, else `config.toml`
    /// in [`config_dir`](Self::config_dir).
    pub fn config_path() -> PathBuf {
        std::env::var_os("PARLEY_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| Self::config_dir().join("config.toml"))
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "provider.timeout_secs must be greater than 0".into(),
            ));
        }

        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(ConfigError::ValidationError(
                "provider.temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.provider.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "provider.base_url must not be empty".into(),
            ));
        }

        if self.gateway.max_sessions == 0 {
            return Err(ConfigError::ValidationError(
                "gateway.max_sessions must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// The provider secret, or the fatal startup error when there is none.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ConfigError::MissingApiKey),
        }
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.require_api_key().is_ok()
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: ProviderConfig::default(),
            chat: ChatConfig::default(),
            gateway: GatewayConfig::default(),
            branding: BrandingConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("No API key configured: set GROQ_API_KEY (or PARLEY_API_KEY) in the environment or a .env file")]
    MissingApiKey,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gateway.port, 8501);
        assert_eq!(config.provider.timeout_secs, 30);
        assert_eq!(config.chat.default_model, ModelId::Llama3_8b);
        assert_eq!(config.chat.default_window_size.get(), 5);
        assert!(config.chat.default_system_prompt.is_empty());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.provider.base_url, config.provider.base_url);
        assert_eq!(parsed.chat.default_model, config.chat.default_model);
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.provider.name, "groq");
        assert!(config.api_key.is_none());
    }

    #[test]
    fn loads_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[chat]
default_model = "gemma2-9b-it"
default_window_size = 8
default_system_prompt = "You are a health educator."

[gateway]
port = 9000
"#
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.chat.default_model, ModelId::Gemma2_9b);
        assert_eq!(config.chat.default_window_size.get(), 8);
        assert_eq!(config.gateway.port, 9000);
        assert_eq!(config.gateway.host, "127.0.0.1");

        let settings = config.chat.default_settings();
        assert_eq!(settings.system_prompt, "You are a health educator.");
    }

    #[test]
    fn out_of_range_window_in_file_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[chat]\ndefault_window_size = 11\n").unwrap();

        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn unknown_model_in_file_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[chat]\ndefault_model = \"gpt-4o\"\n").unwrap();

        assert!(AppConfig::load_from(file.path()).is_err());
    }

    #[test]
    fn zero_timeout_rejected() {
        let mut config = AppConfig::default();
        config.provider.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn invalid_temperature_rejected() {
        let mut config = AppConfig::default();
        config.provider.temperature = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn groq_key_resolved_from_env() {
        let mut config = AppConfig::default();
        config.apply_env(env_of(&[("GROQ_API_KEY", "gsk_test")])).unwrap();
        assert_eq!(config.require_api_key().unwrap(), "gsk_test");
    }

    #[test]
    fn parley_key_takes_priority() {
        let mut config = AppConfig::default();
        config
            .apply_env(env_of(&[("GROQ_API_KEY", "gsk_b"), ("PARLEY_API_KEY", "pk_a")]))
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("pk_a"));
    }

    #[test]
    fn file_key_not_overridden() {
        let mut config = AppConfig {
            api_key: Some("from_file".into()),
            ..AppConfig::default()
        };
        config.apply_env(env_of(&[("GROQ_API_KEY", "gsk_env")])).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("from_file"));
    }

    #[test]
    fn missing_key_is_fatal_error() {
        let mut config = AppConfig::default();
        config.apply_env(env_of(&[("GROQ_API_KEY", "   ")])).unwrap();
        assert!(matches!(config.require_api_key(), Err(ConfigError::MissingApiKey)));
        assert!(!config.has_api_key());
    }

    #[test]
    fn env_overrides_model_and_url() {
        let mut config = AppConfig::default();
        config
            .apply_env(env_of(&[
                ("PARLEY_MODEL", "qwen-2.5-32b"),
                ("PARLEY_BASE_URL", "http://localhost:9999/v1"),
            ]))
            .unwrap();
        assert_eq!(config.chat.default_model, ModelId::Qwen25_32b);
        assert_eq!(config.provider.base_url, "http://localhost:9999/v1");
    }

    #[test]
    fn bad_model_env_rejected() {
        let mut config = AppConfig::default();
        let err = config.apply_env(env_of(&[("PARLEY_MODEL", "nope")])).unwrap_err();
        assert!(err.to_string().contains("PARLEY_MODEL"));
    }

    #[test]
    fn debug_output_redacts_key() {
        let config = AppConfig {
            api_key: Some("gsk_super_secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("gsk_super_secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("api.groq.com"));
        assert!(toml_str.contains("8501"));
        assert!(!toml_str.contains("api_key"));
    }
}
