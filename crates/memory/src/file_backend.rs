//! File-based conversation store: the whole log as one JSON array.
//!
//! Format: `[{"role": "user", "message": "..."}, ...]`, pretty-printed.
//!
//! Storage location: `~/.jarvis/memory.json` (configurable).
//!
//! Turns are held in memory and the complete log is rewritten on every
//! mutation. Writes go to a sibling temp file that is then renamed over the
//! log, so a crash never leaves a half-written array behind.

use async_trait::async_trait;
use jarvis_core::error::MemoryError;
use jarvis_core::memory::ConversationStore;
use jarvis_core::message::{Speaker, Turn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// A file-backed conversation log.
pub struct FileStore {
    path: PathBuf,
    turns: Arc<RwLock<Vec<Turn>>>,
}

impl FileStore {
    /// Open the log at `path`.
    ///
    /// A missing or empty file yields an empty log (the file is created on
    /// first write). A file that exists but does not hold a valid log is
    /// reported as `MemoryError::Corrupted` rather than silently discarded.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, MemoryError> {
        let path = path.into();
        let turns = Self::load_from_disk(&path)?;
        debug!(path = %path.display(), count = turns.len(), "Conversation log loaded");
        Ok(Self {
            path,
            turns: Arc::new(RwLock::new(turns)),
        })
    }

    fn load_from_disk(path: &Path) -> Result<Vec<Turn>, MemoryError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(MemoryError::Storage(format!(
                    "Failed to read conversation log: {e}"
                )));
            }
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            warn!(path = %path.display(), error = %e, "Conversation log is not valid JSON");
            MemoryError::Corrupted {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        })
    }

    /// Rewrite the full log to disk.
    fn flush(&self, turns: &[Turn]) -> Result<(), MemoryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                MemoryError::Storage(format!("Failed to create memory directory: {e}"))
            })?;
        }

        let content = serde_json::to_string_pretty(turns).map_err(|e| {
            MemoryError::Storage(format!("Failed to serialize conversation log: {e}"))
        })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, content).map_err(|e| {
            MemoryError::Storage(format!("Failed to write conversation log: {e}"))
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            MemoryError::Storage(format!("Failed to replace conversation log: {e}"))
        })?;

        Ok(())
    }
}

#[async_trait]
impl ConversationStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn history(&self) -> Vec<Turn> {
        self.turns.read().await.clone()
    }

    async fn append(&self, role: Speaker, message: &str) -> Result<(), MemoryError> {
        let mut turns = self.turns.write().await;
        turns.push(Turn::new(role, message));
        if let Err(e) = self.flush(&turns) {
            turns.pop();
            return Err(e);
        }
        debug!(role = %role, count = turns.len(), "Turn appended");
        Ok(())
    }

    async fn clear(&self) -> Result<(), MemoryError> {
        let mut turns = self.turns.write().await;
        self.flush(&[])?;
        turns.clear();
        debug!("Conversation log cleared");
        Ok(())
    }

    async fn len(&self) -> usize {
        self.turns.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn temp_log() -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("memory.json");
        (dir, path)
    }

    #[tokio::test]
    async fn append_persists_full_log() {
        let (_dir, path) = temp_log();

        let store = FileStore::open(&path).unwrap();
        store.append(Speaker::User, "Hello").await.unwrap();
        store.append(Speaker::Assistant, "Hi, sir.").await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let on_disk: Vec<Turn> = serde_json::from_str(&content).unwrap();
        assert_eq!(
            on_disk,
            vec![Turn::user("Hello"), Turn::assistant("Hi, sir.")]
        );

        // Reload from disk: same log in the same order
        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.history().await, on_disk);
    }

    #[tokio::test]
    async fn missing_file_starts_empty() {
        let (_dir, path) = temp_log();
        let store = FileStore::open(&path).unwrap();
        assert!(store.is_empty().await);
        assert!(!path.exists(), "open must not create the file");
    }

    #[tokio::test]
    async fn empty_file_starts_empty() {
        let tmp = NamedTempFile::new().unwrap();
        let store = FileStore::open(tmp.path()).unwrap();
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn corrupted_file_is_reported() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "this is not json").unwrap();
        let err = FileStore::open(tmp.path()).err().unwrap();
        assert!(matches!(err, MemoryError::Corrupted { .. }));
    }

    #[tokio::test]
    async fn reads_log_written_by_hand() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(
            tmp,
            r#"[
  {{"role": "user", "message": "What is Rust?"}},
  {{"role": "assistant", "message": "A systems language."}},
  {{"role": "user", "message": "Thanks"}}
]"#
        )
        .unwrap();
        let store = FileStore::open(tmp.path()).unwrap();
        let history = store.history().await;
        // An odd-length log (crash mid-exchange) loads as-is
        assert_eq!(history.len(), 3);
        assert_eq!(history[2], Turn::user("Thanks"));
    }

    #[tokio::test]
    async fn clear_is_idempotent_and_persists() {
        let (_dir, path) = temp_log();
        let store = FileStore::open(&path).unwrap();
        store.append(Speaker::User, "one").await.unwrap();
        store.append(Speaker::Assistant, "two").await.unwrap();

        store.clear().await.unwrap();
        assert!(store.history().await.is_empty());
        store.clear().await.unwrap();
        assert!(store.history().await.is_empty());

        assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "[]");
        assert!(FileStore::open(&path).unwrap().is_empty().await);
    }

    #[tokio::test]
    async fn creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("memory.json");
        let store = FileStore::open(&path).unwrap();
        store.append(Speaker::User, "hi").await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn failed_write_is_surfaced_and_rolled_back() {
        // A directory where the log file should be makes every write fail
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("memory.json");
        std::fs::create_dir(&path).unwrap();
        let store = FileStore {
            path: path.clone(),
            turns: Arc::new(RwLock::new(Vec::new())),
        };

        let result = store.append(Speaker::User, "lost?").await;
        assert!(matches!(result, Err(MemoryError::Storage(_))));
        assert!(store.history().await.is_empty());
    }

    #[tokio::test]
    async fn history_is_a_snapshot() {
        let (_dir, path) = temp_log();
        let store = FileStore::open(&path).unwrap();
        store.append(Speaker::User, "first").await.unwrap();

        let mut snapshot = store.history().await;
        snapshot.push(Turn::assistant("injected"));

        assert_eq!(store.len().await, 1);
    }
}
