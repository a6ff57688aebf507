//! `jarvis history` / `jarvis clear`: Inspect or reset the conversation log.

use jarvis_core::memory::ConversationStore;
use jarvis_memory::FileStore;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let store = FileStore::open(config.memory.resolved_path())?;

    let history = store.history().await;
    if history.is_empty() {
        println!("No conversation history yet.");
        return Ok(());
    }

    for turn in history {
        println!("{turn}");
    }
    Ok(())
}

pub async fn clear(confirm: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let path = config.memory.resolved_path();

    if !confirm {
        println!("⚠️  This deletes every turn in {}.", path.display());
        println!("   Re-run with --confirm to proceed.");
        return Ok(());
    }

    let store = FileStore::open(&path)?;
    let removed = store.len().await;
    store.clear().await?;
    println!("🧹 Cleared {removed} turn(s) from {}", path.display());
    Ok(())
}
