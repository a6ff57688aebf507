//! `jarvis onboard`: Create the config directory and a starter config.

use jarvis_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🤖 Jarvis Setup");
    println!("===============\n");

    let config_dir = AppConfig::config_dir();
    std::fs::create_dir_all(&config_dir)?;
    println!("✅ Config directory: {}", config_dir.display());

    let config_path = config_dir.join("config.toml");
    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
        println!("\n📝 Next steps:");
        println!("   1. Add `api_key = \"...\"` to {} (or set GEMINI_API_KEY)", config_path.display());
        println!("   2. Run: jarvis chat");
        println!("   3. Or:  jarvis voice\n");
    }

    println!("🎉 Setup complete!\n");
    Ok(())
}
