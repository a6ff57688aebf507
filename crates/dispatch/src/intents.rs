//! Deterministic intents, resolved without the LLM.
//!
//! Matching is substring-based on the case-folded utterance. The checks run
//! in a fixed order and the first hit wins; within the website and app
//! tables, table order breaks ties.

/// Words that end the session wherever they appear.
pub const EXIT_KEYWORDS: &[&str] = &["exit", "quit", "goodbye", "stop"];

/// Verbs that trigger the website and app tables.
pub const OPEN_VERBS: &[&str] = &["open", "launch", "start"];

pub const WEBSITES: &[(&str, &str)] = &[
    ("youtube", "https://youtube.com"),
    ("google", "https://google.com"),
    ("github", "https://github.com"),
    ("twitter", "https://twitter.com"),
    ("reddit", "https://reddit.com"),
    ("facebook", "https://facebook.com"),
    ("instagram", "https://instagram.com"),
    ("linkedin", "https://linkedin.com"),
    ("netflix", "https://netflix.com"),
    ("amazon", "https://amazon.com"),
];

pub const APPS: &[(&str, &str)] = &[
    ("terminal", "Terminal"),
    ("vscode", "Visual Studio Code"),
    ("code", "Visual Studio Code"),
    ("notes", "Notes"),
    ("mail", "Mail"),
    ("calendar", "Calendar"),
    ("finder", "Finder"),
];

const ENCYCLOPEDIA_KEYWORD: &str = "wikipedia";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// End the session.
    Exit,
    /// Handled on the spot without leaving the session.
    Local(LocalIntent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalIntent {
    Time,
    Identity,
    /// Look up the utterance with the trigger keyword removed.
    Encyclopedia { query: String },
    OpenWebsite { keyword: &'static str, url: &'static str },
    OpenApp { keyword: &'static str, app_name: &'static str },
}

/// Match an utterance against the deterministic intents.
///
/// `None` means the utterance must go to the LLM.
pub fn detect(utterance: &str) -> Option<Intent> {
    let text = utterance.trim().to_lowercase();

    if EXIT_KEYWORDS.iter().any(|k| text.contains(k)) {
        return Some(Intent::Exit);
    }
    if text.contains("time") {
        return Some(Intent::Local(LocalIntent::Time));
    }
    if text.contains("your name") {
        return Some(Intent::Local(LocalIntent::Identity));
    }
    if text.contains(ENCYCLOPEDIA_KEYWORD) {
        let query = text.replace(ENCYCLOPEDIA_KEYWORD, "").trim().to_string();
        return Some(Intent::Local(LocalIntent::Encyclopedia { query }));
    }
    if let Some(&(keyword, url)) = first_opened(&text, WEBSITES) {
        return Some(Intent::Local(LocalIntent::OpenWebsite { keyword, url }));
    }
    if let Some(&(keyword, app_name)) = first_opened(&text, APPS) {
        return Some(Intent::Local(LocalIntent::OpenApp { keyword, app_name }));
    }
    None
}

fn first_opened<'t>(text: &str, table: &'t [(&'static str, &'static str)]) -> Option<&'t (&'static str, &'static str)> {
    table.iter().find(|(keyword, _)| {
        OPEN_VERBS
            .iter()
            .any(|verb| text.contains(&format!("{verb} {keyword}")))
    })
}
