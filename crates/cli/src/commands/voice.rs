//! `jarvis voice`: Voice-command session.
//!
//! Utterances are read one per line from stdin (pipe in a speech
//! recognizer, or type). Replies go to the configured voice.

use jarvis_config::TtsBackend;
use jarvis_core::effector::Voice;
use jarvis_dispatch::intents::APPS;
use jarvis_dispatch::{CommandRouter, LineSource, RouterSettings, SessionEnd, run_session};
use jarvis_tools::{ConsoleVoice, SystemDesktop, SystemVoice, WikipediaEncyclopedia};
use std::sync::Arc;

pub async fn run(console: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config()?;
    let backend = super::backend(&config)?;

    let voice: Arc<dyn Voice> = if console || config.voice.tts == TtsBackend::Console {
        Arc::new(ConsoleVoice)
    } else {
        Arc::new(SystemVoice::new())
    };

    let mut allowed_apps: Vec<String> = APPS.iter().map(|(_, app)| app.to_string()).collect();
    allowed_apps.extend(config.voice.allowed_apps.iter().cloned());

    let router = CommandRouter::new(
        backend,
        Arc::new(SystemDesktop::new(allowed_apps)),
        voice,
        Arc::new(WikipediaEncyclopedia::new(&config.voice.lookup_language)),
    )
    .with_settings(RouterSettings {
        search_url: config.voice.search_url.clone(),
        lookup_sentences: config.voice.lookup_sentences,
    });

    println!("  🎙️  Jarvis is listening. Say \"goodbye\" to stop.");
    let mut source = LineSource::stdin().with_prompt("  You > ");

    match run_session(&router, &mut source).await {
        SessionEnd::Exit => {}
        SessionEnd::EndOfInput => println!(),
    }

    Ok(())
}
