//! Conversation store trait: the durable turn-by-turn log.
//!
//! The store is the sole writer and the sole source of truth for the log.
//! Callers only ever receive snapshots.

use crate::error::MemoryError;
use crate::message::{Speaker, Turn};
use async_trait::async_trait;

/// The core ConversationStore trait.
///
/// Implementations: file-backed JSON (`FileStore`), in-memory (for testing).
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// The backend name (e.g., "file", "in_memory").
    fn name(&self) -> &str;

    /// Snapshot of the current in-memory log. Performs no I/O.
    async fn history(&self) -> Vec<Turn>;

    /// Append one turn and persist the full log.
    ///
    /// On a persistence failure the turn is not retained and the error
    /// is returned.
    async fn append(&self, role: Speaker, message: &str) -> Result<(), MemoryError>;

    /// Empty the log and persist.
    async fn clear(&self) -> Result<(), MemoryError>;

    /// Number of turns currently held.
    async fn len(&self) -> usize {
        self.history().await.len()
    }

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
