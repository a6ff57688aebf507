//! `jarvis doctor`: Diagnose setup problems.

use jarvis_config::{AppConfig, TtsBackend};
use jarvis_memory::FileStore;
use jarvis_providers::GenerationBackend;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Jarvis Doctor — System Diagnostics");
    println!("=====================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file found");
    } else {
        println!("  ⚠️  No config file — run `jarvis onboard` (environment variables still apply)");
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid ({} / {})", config.provider, config.model);
            config
        }
        Err(e) => {
            println!("  ❌ Configuration invalid: {e}");
            println!("\n  ⚠️  Fix the configuration before running other checks.");
            return Ok(());
        }
    };

    let path = config.memory.resolved_path();
    match FileStore::open(&path) {
        Ok(_) => println!("  ✅ Conversation log readable: {}", path.display()),
        Err(e) => {
            println!("  ❌ Conversation log unusable: {e}");
            issues += 1;
        }
    }

    if config.voice.tts == TtsBackend::Console {
        println!("  ✅ Voice output: console");
    } else {
        println!("  ✅ Voice output: system speech (falls back to console if unavailable)");
    }

    match GenerationBackend::from_config(&config) {
        Ok(backend) => {
            println!("  ✅ API key configured");
            match backend.provider().health_check().await {
                Ok(true) => println!("  ✅ Provider '{}' reachable", backend.provider_name()),
                Ok(false) => {
                    println!("  ❌ Provider '{}' rejected the health check", backend.provider_name());
                    issues += 1;
                }
                Err(e) => {
                    println!("  ❌ Provider '{}' unreachable: {e}", backend.provider_name());
                    issues += 1;
                }
            }
        }
        Err(e) => {
            println!("  ❌ {e}");
            issues += 1;
        }
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
