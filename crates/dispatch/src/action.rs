//! Structured actions returned by the LLM.
//!
//! The LLM is an untrusted command channel. Its reply is decoded into a
//! closed set of [`ActionKind`]s; anything else is rejected before any
//! effector runs.

use jarvis_core::error::ActionError;
use serde::Deserialize;

/// Spoken when the reply carries no `speak` text.
pub const DEFAULT_SPEAK: &str = "Working on it";

pub const ACTION_PROMPT: &str = r#"You are JARVIS, an intelligent voice assistant for the desktop.

Your job: interpret the user's query and reply with a structured response.

Available actions:
1. "open_website" - open a website that has no built-in shortcut
2. "open_app" - launch a desktop application that has no built-in shortcut
3. "search_web" - search for something on the web
4. "answer" - answer a general question directly

Response format (a single JSON object, no markdown):
{
  "action": "action_type",
  "parameters": {
    "url": "https://...",
    "app_name": "AppName",
    "query": "search query"
  },
  "speak": "What to say to the user",
  "answer": "Direct answer if applicable"
}

Examples:

User: "What's the capital of France?"
{
  "action": "answer",
  "speak": "The capital of France is Paris",
  "answer": "The capital of France is Paris"
}

User: "Open Stack Overflow"
{
  "action": "open_website",
  "parameters": {"url": "https://stackoverflow.com"},
  "speak": "Opening Stack Overflow"
}

User: "Launch Slack"
{
  "action": "open_app",
  "parameters": {"app_name": "Slack"},
  "speak": "Launching Slack"
}

User: "Search for Python tutorials"
{
  "action": "search_web",
  "parameters": {"query": "Python tutorials"},
  "speak": "Searching for Python tutorials"
}

Keep answers concise and helpful."#;

/// The full prompt sent to the LLM for `utterance`.
pub fn prompt_for(utterance: &str) -> String {
    format!("{ACTION_PROMPT}\n\nUser query: \"{utterance}\"")
}

/// What to do. A missing parameter is kept as `None`: the action is still
/// acknowledged aloud but no effector is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionKind {
    OpenWebsite { url: Option<String> },
    OpenApp { app_name: Option<String> },
    SearchWeb { query: Option<String> },
    Answer { answer: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredAction {
    pub kind: ActionKind,
    pub speak: String,
}

#[derive(Deserialize)]
struct RawAction {
    action: Option<String>,
    #[serde(default)]
    parameters: Option<RawParameters>,
    speak: Option<String>,
    answer: Option<String>,
}

#[derive(Default, Deserialize)]
struct RawParameters {
    url: Option<String>,
    app_name: Option<String>,
    query: Option<String>,
}

impl StructuredAction {
    /// Decode an LLM reply, tolerating a surrounding markdown code fence.
    pub fn parse(reply: &str) -> Result<Self, ActionError> {
        let raw: RawAction = serde_json::from_str(strip_code_fence(reply))?;

        let action = raw.action.ok_or_else(|| ActionError::MissingField {
            action: "<none>".into(),
            field: "action".into(),
        })?;
        let params = raw.parameters.unwrap_or_default();

        let kind = match action.as_str() {
            "open_website" => ActionKind::OpenWebsite {
                url: non_blank(params.url),
            },
            "open_app" => ActionKind::OpenApp {
                app_name: non_blank(params.app_name),
            },
            "search_web" => ActionKind::SearchWeb {
                query: non_blank(params.query),
            },
            "answer" => ActionKind::Answer {
                answer: non_blank(raw.answer),
            },
            other => return Err(ActionError::UnknownAction(other.to_string())),
        };

        Ok(Self {
            kind,
            speak: non_blank(raw.speak).unwrap_or_else(|| DEFAULT_SPEAK.to_string()),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Remove a leading ```` ```json ```` / ```` ``` ```` fence and a trailing
/// ```` ``` ````.
pub fn strip_code_fence(text: &str) -> &str {
    text.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}
