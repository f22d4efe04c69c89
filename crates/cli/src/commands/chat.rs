//! `parley chat` — Interactive or single-message chat from the terminal.

use std::io::Write;
use std::sync::Arc;

use parley_chat::ChatEngine;
use parley_config::AppConfig;
use parley_core::error::Error;
use parley_core::session::Session;
use parley_core::settings::{ChatSettings, ModelId, WindowSize};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Control values given on the command line.
#[derive(Debug, Default)]
pub struct Overrides {
    pub model: Option<String>,
    pub window: Option<i64>,
    pub system: Option<String>,
}

impl Overrides {
    /// Settings for the whole terminal session.
    pub fn apply(self, defaults: ChatSettings) -> Result<ChatSettings, Error> {
        let model = match self.model {
            Some(m) => m.parse::<ModelId>()?,
            None => defaults.model,
        };
        let window_size = match self.window {
            Some(k) => WindowSize::new(k)?,
            None => defaults.window_size,
        };
        let system_prompt = self.system.unwrap_or(defaults.system_prompt);
        Ok(ChatSettings::new(system_prompt, model, window_size))
    }
}

pub async fn run(overrides: Overrides, message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Err(e) = config.require_api_key() {
        eprintln!();
        eprintln!("  ERROR: {e}");
        eprintln!();
        eprintln!("  Or add `api_key` to your config file:");
        eprintln!("    {}", AppConfig::config_path().display());
        eprintln!();
        return Err(e.into());
    }

    let settings = overrides.apply(config.chat.default_settings())?;
    let provider = Arc::new(parley_providers::build_from_config(&config)?);
    let engine = ChatEngine::from_config(provider, &config);
    let mut session = Session::new();

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let outcome = engine.respond(&mut session, &settings, &msg).await;
        eprint!("\r              \r");
        if let Some(exchange) = outcome? {
            println!("{}", exchange.turn.assistant());
        }
        return Ok(());
    }

    println!();
    println!("  Parley — Interactive Mode");
    println!();
    println!("  Provider:  {}", config.provider.name);
    println!("  Model:     {}", settings.model);
    println!("  Memory:    last {} exchanges", settings.window_size.get());
    println!();
    println!("  {}", config.branding.greeting);
    println!("  Type 'exit' or Ctrl+D to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if matches!(line.trim(), "exit" | "quit") {
            break;
        }

        eprint!("  ...");
        let outcome = engine.respond(&mut session, &settings, &line).await;
        eprint!("\r     \r");

        match outcome {
            Ok(Some(exchange)) => {
                println!();
                for text in exchange.turn.assistant().lines() {
                    println!("  Chatbot > {text}");
                }
                println!();
            }
            Ok(None) => {}
            Err(e) => {
                eprintln!("  [Error] {e}");
                println!();
            }
        }
    }

    println!();
    println!("  Goodbye!");
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_overrides_keeps_defaults() {
        let defaults = ChatSettings::default();
        let settings = Overrides::default().apply(defaults.clone()).unwrap();
        assert_eq!(settings, defaults);
    }

    #[test]
    fn overrides_replace_each_field() {
        let settings = Overrides {
            model: Some("deepseek-r1-distill-qwen-32b".into()),
            window: Some(10),
            system: Some("Be brief.".into()),
        }
        .apply(ChatSettings::default())
        .unwrap();

        assert_eq!(settings.model, ModelId::DeepseekR1DistillQwen32b);
        assert_eq!(settings.window_size.get(), 10);
        assert_eq!(settings.system_prompt, "Be brief.");
    }

    #[test]
    fn invalid_overrides_rejected() {
        let bad_window = Overrides {
            window: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            bad_window.apply(ChatSettings::default()),
            Err(Error::InvalidSettings(_))
        ));

        let bad_model = Overrides {
            model: Some("gpt-4".into()),
            ..Default::default()
        };
        assert!(bad_model.apply(ChatSettings::default()).is_err());
    }
}
