pub mod chat;
pub mod doctor;
pub mod history;
pub mod onboard;
pub mod voice;

use jarvis_config::{API_KEY_VARS, AppConfig, ConfigError};
use jarvis_providers::GenerationBackend;
use tracing::debug;

pub(crate) fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    debug!(config = ?config, "Configuration loaded");
    Ok(config)
}

/// Build the generation backend, explaining how to set a key if none is
/// configured.
pub(crate) fn backend(config: &AppConfig) -> Result<GenerationBackend, Box<dyn std::error::Error>> {
    match GenerationBackend::from_config(config) {
        Ok(backend) => Ok(backend),
        Err(ConfigError::MissingApiKey) => {
            eprintln!();
            eprintln!("  ERROR: No API key configured!");
            eprintln!();
            eprintln!("  Set one of these environment variables (or put it in a .env file):");
            for var in API_KEY_VARS {
                eprintln!("    {var}");
            }
            eprintln!();
            eprintln!("  Or add `api_key = \"...\"` to your config file:");
            eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
            eprintln!();
            Err("No API key found. See above for setup instructions.".into())
        }
        Err(e) => Err(e.into()),
    }
}
