//! `parley models` — List the selectable models.

use parley_config::AppConfig;
use parley_core::settings::{ModelId, WindowSize};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("Models:");
    for model in ModelId::ALL {
        let marker = if model == config.chat.default_model { "*" } else { " " };
        println!("  {marker} {model}");
    }
    println!();
    println!(
        "Memory window: {}..={} exchanges (default {})",
        WindowSize::MIN,
        WindowSize::MAX,
        config.chat.default_window_size.get()
    );

    Ok(())
}
