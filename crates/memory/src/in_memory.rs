//! In-memory store: useful for testing and ephemeral sessions.

use async_trait::async_trait;
use jarvis_core::error::MemoryError;
use jarvis_core::memory::ConversationStore;
use jarvis_core::message::{Speaker, Turn};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A conversation log that lives only as long as the process.
pub struct InMemoryStore {
    turns: Arc<RwLock<Vec<Turn>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            turns: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Start from an existing log.
    pub fn with_turns(turns: Vec<Turn>) -> Self {
        Self {
            turns: Arc::new(RwLock::new(turns)),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConversationStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn history(&self) -> Vec<Turn> {
        self.turns.read().await.clone()
    }

    async fn append(&self, role: Speaker, message: &str) -> Result<(), MemoryError> {
        self.turns.write().await.push(Turn::new(role, message));
        Ok(())
    }

    async fn clear(&self) -> Result<(), MemoryError> {
        self.turns.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_keeps_insertion_order() {
        let store = InMemoryStore::new();
        store.append(Speaker::User, "a").await.unwrap();
        store.append(Speaker::Assistant, "b").await.unwrap();
        store.append(Speaker::User, "a").await.unwrap();

        let history = store.history().await;
        assert_eq!(history.len(), 3, "duplicates are kept");
        assert_eq!(history[1], Turn::assistant("b"));
    }

    #[tokio::test]
    async fn clear_empties() {
        let store = InMemoryStore::with_turns(vec![Turn::user("x")]);
        store.clear().await.unwrap();
        assert!(store.is_empty().await);
    }
}
