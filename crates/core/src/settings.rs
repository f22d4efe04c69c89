//! Per-request chat settings: system prompt, model, and window size.
//!
//! Settings are validated once, when they enter the system, and then passed
//! around by value. A value of [`ChatSettings`] is the snapshot a request
//! runs with, whatever the controls show by the time the reply arrives.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// The models offered in the model picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModelId {
    #[default]
    #[serde(rename = "llama3-8b-8192")]
    Llama3_8b,
    #[serde(rename = "qwen-2.5-32b")]
    Qwen25_32b,
    #[serde(rename = "gemma2-9b-it")]
    Gemma2_9b,
    #[serde(rename = "deepseek-r1-distill-qwen-32b")]
    DeepseekR1DistillQwen32b,
}

impl ModelId {
    /// Every supported model, in display order.
    pub const ALL: [ModelId; 4] = [
        ModelId::Llama3_8b,
        ModelId::Qwen25_32b,
        ModelId::Gemma2_9b,
        ModelId::DeepseekR1DistillQwen32b,
    ];

    /// The identifier sent to the provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Llama3_8b => "llama3-8b-8192",
            Self::Qwen25_32b => "qwen-2.5-32b",
            Self::Gemma2_9b => "gemma2-9b-it",
            Self::DeepseekR1DistillQwen32b => "deepseek-r1-distill-qwen-32b",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| Error::InvalidSettings(format!("unsupported model '{s}'")))
    }
}

/// How many past turns are replayed with each request (1–10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "usize")]
pub struct WindowSize(usize);

impl WindowSize {
    pub const MIN: usize = 1;
    pub const MAX: usize = 10;
    pub const DEFAULT: WindowSize = WindowSize(5);

    /// Validate a raw window size.
    pub fn new(k: i64) -> Result<Self, Error> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&k) {
            Ok(Self(k as usize))
        } else {
            Err(Error::InvalidSettings(format!(
                "window size {k} outside {}..={}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<i64> for WindowSize {
    type Error = Error;

    fn try_from(k: i64) -> Result<Self, Self::Error> {
        Self::new(k)
    }
}

impl From<WindowSize> for usize {
    fn from(k: WindowSize) -> usize {
        k.0
    }
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything a single request needs besides the question itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Sent verbatim as the system message; may be empty.
    #[serde(default)]
    pub system_prompt: String,

    #[serde(default)]
    pub model: ModelId,

    #[serde(default)]
    pub window_size: WindowSize,
}

impl ChatSettings {
    pub fn new(system_prompt: impl Into<String>, model: ModelId, window_size: WindowSize) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            model,
            window_size,
        }
    }

    /// Validate settings coming straight from user controls.
    pub fn from_raw(system_prompt: impl Into<String>, model: &str, window_size: i64) -> Result<Self, Error> {
        Ok(Self::new(system_prompt, model.parse()?, WindowSize::new(window_size)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_ids_round_trip_through_strings() {
        for model in ModelId::ALL {
            assert_eq!(model.as_str().parse::<ModelId>().unwrap(), model);
        }
        assert_eq!(ModelId::default().as_str(), "llama3-8b-8192");
    }

    #[test]
    fn unknown_model_rejected() {
        let err = "gpt-4o".parse::<ModelId>().unwrap_err();
        assert!(matches!(err, Error::InvalidSettings(_)));
    }

    #[test]
    fn model_serializes_as_wire_id() {
        let json = serde_json::to_string(&ModelId::Gemma2_9b).unwrap();
        assert_eq!(json, "\"gemma2-9b-it\"");
    }

    #[test]
    fn window_size_bounds() {
        assert!(WindowSize::new(0).is_err());
        assert!(WindowSize::new(-3).is_err());
        assert!(WindowSize::new(11).is_err());
        assert_eq!(WindowSize::new(1).unwrap().get(), 1);
        assert_eq!(WindowSize::new(10).unwrap().get(), 10);
        assert_eq!(WindowSize::default().get(), 5);
    }

    #[test]
    fn window_size_deserialization_validates() {
        assert!(serde_json::from_str::<WindowSize>("7").is_ok());
        assert!(serde_json::from_str::<WindowSize>("42").is_err());
    }

    #[test]
    fn settings_from_raw() {
        let settings = ChatSettings::from_raw("Be kind.", "qwen-2.5-32b", 3).unwrap();
        assert_eq!(settings.model, ModelId::Qwen25_32b);
        assert_eq!(settings.window_size.get(), 3);
        assert_eq!(settings.system_prompt, "Be kind.");

        assert!(ChatSettings::from_raw("", "qwen-2.5-32b", 12).is_err());
        assert!(ChatSettings::from_raw("", "nope", 3).is_err());
    }

    #[test]
    fn settings_defaults_when_fields_missing() {
        let settings: ChatSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, ChatSettings::default());
        assert_eq!(settings.window_size, WindowSize::DEFAULT);
    }
}
