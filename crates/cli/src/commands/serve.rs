//! `parley serve` — Start the web chat server.

use parley_config::AppConfig;

pub async fn run(
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(host) = host_override {
        config.gateway.host = host;
    }
    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    // Fatal before anything is bound.
    config.require_api_key()?;

    println!("Parley");
    println!("   Open:      http://{}:{}/", config.gateway.host, config.gateway.port);
    println!("   Provider:  {} ({})", config.provider.name, config.provider.base_url);
    println!("   Model:     {} (default)", config.chat.default_model);

    parley_gateway::start(config).await?;

    Ok(())
}
