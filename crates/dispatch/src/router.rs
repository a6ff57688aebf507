//! The two-tier command router.

use crate::action::{self, ActionKind, StructuredAction};
use crate::intents::{self, Intent, LocalIntent};
use chrono::Local;
use jarvis_core::effector::{Desktop, Encyclopedia, Voice};
use jarvis_core::error::{ActionError, Error, ToolError};
use jarvis_providers::GenerationBackend;
use jarvis_tools::search_url;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const FAREWELL: &str = "Goodbye sir! Have a nice day.";
pub const IDENTITY: &str = "My name is Jarvis, sir.";
pub const LOOKUP_START: &str = "Searching Wikipedia...";
pub const LOOKUP_PREFIX: &str = "According to Wikipedia";
pub const LOOKUP_FAILED: &str = "I couldn't find that on Wikipedia.";
/// Spoken when the LLM reply is not valid JSON.
pub const PARSE_APOLOGY: &str = "I understood your request, but couldn't process it correctly.";
/// Spoken for every other failure on the LLM path.
pub const GENERAL_APOLOGY: &str = "I'm having trouble with that request.";

/// How an utterance was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The exit intent fired; the session should end.
    Exit,
    /// Resolved by a deterministic intent.
    Handled,
    /// Sent to the LLM (whether or not its action succeeded).
    Delegated,
}

#[derive(Debug, Clone)]
pub struct RouterSettings {
    pub search_url: String,
    pub lookup_sentences: usize,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            search_url: "https://www.google.com/search".into(),
            lookup_sentences: 2,
        }
    }
}

pub struct CommandRouter {
    backend: GenerationBackend,
    desktop: Arc<dyn Desktop>,
    voice: Arc<dyn Voice>,
    encyclopedia: Arc<dyn Encyclopedia>,
    settings: RouterSettings,
}

impl CommandRouter {
    pub fn new(
        backend: GenerationBackend,
        desktop: Arc<dyn Desktop>,
        voice: Arc<dyn Voice>,
        encyclopedia: Arc<dyn Encyclopedia>,
    ) -> Self {
        Self {
            backend,
            desktop,
            voice,
            encyclopedia,
            settings: RouterSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: RouterSettings) -> Self {
        self.settings = settings;
        self
    }

    pub async fn speak(&self, text: &str) {
        self.voice.speak(text).await;
    }

    /// Handle one utterance. Never fails: every problem on the LLM path
    /// ends in a spoken apology.
    pub async fn dispatch(&self, utterance: &str) -> Outcome {
        match intents::detect(utterance) {
            Some(Intent::Exit) => {
                self.speak(FAREWELL).await;
                Outcome::Exit
            }
            Some(Intent::Local(intent)) => {
                info!(intent = ?intent, "Handled by deterministic intent");
                self.handle_intent(intent).await;
                Outcome::Handled
            }
            None => {
                info!("No deterministic match, delegating to LLM");
                if let Err(e) = self.delegate(utterance.trim()).await {
                    warn!(error = %e, "LLM action failed");
                    self.speak(apology_for(&e)).await;
                }
                Outcome::Delegated
            }
        }
    }

    async fn handle_intent(&self, intent: LocalIntent) {
        match intent {
            LocalIntent::Time => {
                let now = Local::now().format("%H:%M:%S");
                self.speak(&format!("Sir, the time is {now}")).await;
            }
            LocalIntent::Identity => self.speak(IDENTITY).await,
            LocalIntent::Encyclopedia { query } => {
                self.speak(LOOKUP_START).await;
                match self
                    .encyclopedia
                    .summary(&query, self.settings.lookup_sentences)
                    .await
                {
                    Ok(summary) => {
                        self.speak(LOOKUP_PREFIX).await;
                        self.speak(&summary).await;
                    }
                    Err(e) => {
                        debug!(query = %query, error = %e, "Lookup failed");
                        self.speak(LOOKUP_FAILED).await;
                    }
                }
            }
            LocalIntent::OpenWebsite { keyword, url } => {
                self.speak(&format!("Opening {keyword}")).await;
                if let Err(e) = self.desktop.open_url(url).await {
                    warn!(url, error = %e, "Could not open website");
                }
            }
            LocalIntent::OpenApp { app_name, .. } => {
                self.speak(&format!("Opening {app_name}")).await;
                if let Err(e) = self.desktop.launch_app(app_name).await {
                    warn!(app = app_name, error = %e, "Could not launch application");
                }
            }
        }
    }

    async fn delegate(&self, utterance: &str) -> Result<(), Error> {
        let reply = self.backend.try_generate(&action::prompt_for(utterance)).await?;
        let action = StructuredAction::parse(&reply)?;
        info!(action = ?action.kind, "LLM action decoded");
        self.execute(action).await?;
        Ok(())
    }

    /// Speak the acknowledgement, then run the side effect.
    pub async fn execute(&self, action: StructuredAction) -> Result<(), ToolError> {
        self.speak(&action.speak).await;

        match action.kind {
            ActionKind::OpenWebsite { url: Some(url) } => self.desktop.open_url(&url).await,
            ActionKind::OpenApp { app_name: Some(app) } => self.desktop.launch_app(&app).await,
            ActionKind::SearchWeb { query: Some(query) } => {
                let url = search_url(&self.settings.search_url, &query)?;
                self.desktop.open_url(&url).await
            }
            // Only speak the answer if it adds something to the acknowledgement
            ActionKind::Answer { answer: Some(answer) } if answer != action.speak => {
                self.speak(&answer).await;
                Ok(())
            }
            other => {
                debug!(action = ?other, "Nothing further to do");
                Ok(())
            }
        }
    }
}

fn apology_for(error: &Error) -> &'static str {
    match error {
        Error::Action(ActionError::Malformed(_)) => PARSE_APOLOGY,
        _ => GENERAL_APOLOGY,
    }
}
