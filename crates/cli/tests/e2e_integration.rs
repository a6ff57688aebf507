//! End-to-end tests for the Jarvis assistant.
//!
//! These exercise the chat path (prompt → generation → persisted log) and
//! the voice path (session loop → router → effectors) through public APIs,
//! with a scripted provider and recording effectors in place of the
//! network and the desktop.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::StreamExt;
use jarvis_agent::ChatAgent;
use jarvis_core::effector::{Desktop, Encyclopedia, Voice};
use jarvis_core::error::{ProviderError, ToolError};
use jarvis_core::memory::ConversationStore;
use jarvis_core::message::{Speaker, Turn};
use jarvis_core::provider::{ChunkReceiver, Provider, ProviderRequest, ProviderResponse, StreamChunk};
use jarvis_core::role::Role;
use jarvis_dispatch::{CommandRouter, LineSource, SessionEnd, run_session};
use jarvis_memory::FileStore;
use jarvis_providers::GenerationBackend;

// ── Mock Provider ────────────────────────────────────────────────────────

/// Returns scripted replies in sequence and records every prompt.
struct ScriptedProvider {
    replies: Vec<&'static str>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    fn new(replies: Vec<&'static str>) -> Arc<Self> {
        Arc::new(Self {
            replies,
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn next_reply(&self, prompt: String) -> &'static str {
        let mut prompts = self.prompts.lock().unwrap();
        let index = prompts.len();
        prompts.push(prompt);
        self.replies
            .get(index)
            .copied()
            .unwrap_or_else(|| panic!("ScriptedProvider exhausted at call #{index}"))
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let text = self.next_reply(request.prompt).to_string();
        Ok(ProviderResponse {
            text,
            usage: None,
            model: request.model,
        })
    }

    /// Streams the reply word by word.
    async fn stream(&self, request: ProviderRequest) -> Result<ChunkReceiver, ProviderError> {
        let reply = self.next_reply(request.prompt);
        let words: Vec<String> = reply.split_inclusive(' ').map(String::from).collect();
        let (tx, rx) = tokio::sync::mpsc::channel(words.len() + 1);
        for word in words {
            tx.send(Ok(StreamChunk::text(word))).await.unwrap();
        }
        tx.send(Ok(StreamChunk::finished(None))).await.unwrap();
        Ok(rx)
    }
}

// ── Recording effectors ──────────────────────────────────────────────────

#[derive(Default)]
struct Desk {
    spoken: Mutex<Vec<String>>,
    opened: Mutex<Vec<String>>,
    launched: Mutex<Vec<String>>,
}

#[async_trait]
impl Voice for Desk {
    async fn speak(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }
}

#[async_trait]
impl Desktop for Desk {
    async fn open_url(&self, url: &str) -> Result<(), ToolError> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn launch_app(&self, app_name: &str) -> Result<(), ToolError> {
        self.launched.lock().unwrap().push(app_name.to_string());
        Ok(())
    }
}

struct NoLookup;

#[async_trait]
impl Encyclopedia for NoLookup {
    async fn summary(&self, query: &str, _sentences: usize) -> Result<String, ToolError> {
        Err(ToolError::NotFound(query.to_string()))
    }
}

fn router(provider: Arc<ScriptedProvider>, desk: Arc<Desk>) -> CommandRouter {
    CommandRouter::new(
        GenerationBackend::new(provider, "e2e-model"),
        desk.clone(),
        desk,
        Arc::new(NoLookup),
    )
}

// ── Chat ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn chat_history_persists_across_sessions() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("memory.json");

    let provider = ScriptedProvider::new(vec!["Ownership moves values.", "Borrowing lends them."]);
    {
        let store = Arc::new(FileStore::open(&path).unwrap());
        let agent = ChatAgent::new(GenerationBackend::new(provider.clone(), "e2e-model"), store);
        agent.respond("What is ownership?", &Role::Tutor).await.unwrap();
    }

    // A new process picks the log back up and feeds it into the prompt
    let store = Arc::new(FileStore::open(&path).unwrap());
    let agent = ChatAgent::new(GenerationBackend::new(provider.clone(), "e2e-model"), store);
    let reply = agent.respond("And borrowing?", &Role::Coder).await.unwrap();
    assert_eq!(reply, "Borrowing lends them.");

    let second_prompt = provider.prompts.lock().unwrap()[1].clone();
    assert!(second_prompt.contains("User: What is ownership?\nAssistant: Ownership moves values."));
    assert!(second_prompt.contains("Coding Assistant"));
    assert!(second_prompt.ends_with("USER:\nAnd borrowing?\n\nASSISTANT:"));

    let raw: log_file::Log = log_file::read(&path);
    assert_eq!(raw.len(), 4);
    assert_eq!(raw[0].role, Speaker::User);
    assert_eq!(raw[3].role, Speaker::Assistant);
}

#[tokio::test]
async fn streamed_reply_is_persisted_whole() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("memory.json");
    let store = Arc::new(FileStore::open(&path).unwrap());
    let agent = ChatAgent::new(
        GenerationBackend::new(ScriptedProvider::new(vec!["The capital is Paris."]), "e2e-model"),
        store,
    );

    let fragments: Vec<String> = agent
        .respond_stream("Capital of France?", &Role::Tutor)
        .await
        .map(|item| item.unwrap())
        .collect()
        .await;
    assert_eq!(fragments.len(), 4);

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(
        reopened.history().await,
        vec![
            Turn::user("Capital of France?"),
            Turn::assistant("The capital is Paris."),
        ]
    );
}

#[tokio::test]
async fn cancelled_stream_then_full_reply() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("memory.json");
    let store = Arc::new(FileStore::open(&path).unwrap());
    let agent = ChatAgent::new(
        GenerationBackend::new(
            ScriptedProvider::new(vec!["a long story that never ends", "short answer"]),
            "e2e-model",
        ),
        store,
    );

    let mut stream = agent.respond_stream("tell me a story", &Role::Mentor).await;
    stream.next().await.unwrap().unwrap();
    drop(stream);
    assert!(agent.history().await.is_empty());
    assert!(!path.exists());

    agent.respond("short please", &Role::Mentor).await.unwrap();
    assert_eq!(FileStore::open(&path).unwrap().len().await, 2);
}

// ── Voice ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn voice_session_runs_until_goodbye() {
    let provider = ScriptedProvider::new(vec![
        r#"{"action": "open_app", "parameters": {"app_name": "Slack"}, "speak": "Launching Slack"}"#,
    ]);
    let desk = Arc::new(Desk::default());
    let router = router(provider.clone(), desk.clone());

    let input = b"Open YouTube\n\nlaunch slack\ngoodbye\nopen github\n";
    let mut source = LineSource::new(&input[..]);

    assert_eq!(run_session(&router, &mut source).await, SessionEnd::Exit);

    assert_eq!(provider.calls(), 1);
    assert_eq!(desk.opened.lock().unwrap().as_slice(), ["https://youtube.com"]);
    assert_eq!(desk.launched.lock().unwrap().as_slice(), ["Slack"]);

    let spoken = desk.spoken.lock().unwrap().clone();
    assert!(spoken[0].starts_with("Good "));
    assert_eq!(
        &spoken[1..],
        ["Opening youtube", "Launching Slack", "Goodbye sir! Have a nice day."]
    );
}

#[tokio::test]
async fn voice_session_ends_with_input() {
    let provider = ScriptedProvider::new(vec!["not json at all"]);
    let desk = Arc::new(Desk::default());
    let router = router(provider.clone(), desk.clone());

    let mut source = LineSource::new(&b"do something clever\n"[..]);
    assert_eq!(run_session(&router, &mut source).await, SessionEnd::EndOfInput);

    let spoken = desk.spoken.lock().unwrap().clone();
    assert_eq!(
        spoken.last().map(String::as_str),
        Some("I understood your request, but couldn't process it correctly.")
    );
    assert!(desk.opened.lock().unwrap().is_empty());
    assert!(desk.launched.lock().unwrap().is_empty());
}

#[tokio::test]
async fn llm_receives_lowercased_utterance() {
    let provider = ScriptedProvider::new(vec![
        r#"{"action": "answer", "speak": "Paris", "answer": "Paris"}"#,
    ]);
    let desk = Arc::new(Desk::default());
    let router = router(provider.clone(), desk.clone());

    let mut source = LineSource::new(&b"What's The Capital Of France?\n"[..]);
    run_session(&router, &mut source).await;

    let prompt = provider.prompts.lock().unwrap()[0].clone();
    assert!(prompt.ends_with("User query: \"what's the capital of france?\""));
    assert_eq!(desk.spoken.lock().unwrap().last().map(String::as_str), Some("Paris"));
}

/// Minimal reader for the on-disk log format.
mod log_file {
    use jarvis_core::message::Turn;
    use std::path::Path;

    pub type Log = Vec<Turn>;

    pub fn read(path: &Path) -> Log {
        let text = std::fs::read_to_string(path).unwrap();
        serde_json::from_str(&text).unwrap()
    }
}
