//! `parley init` — Write a default config file.

use parley_config::AppConfig;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_path();

    println!("Parley — First-Time Setup");
    println!("=========================\n");

    if config_path.exists() {
        println!("⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete it and re-run init.\n");
        return Ok(());
    }

    if let Some(dir) = config_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("✅ Created config.toml at: {}", config_path.display());

    println!("\n📝 Next steps:");
    println!("   1. Put GROQ_API_KEY=... in a .env file, or add api_key to the config");
    println!("   2. Run `parley doctor` to check the setup");
    println!("   3. Run `parley serve` and open the printed address\n");

    Ok(())
}
