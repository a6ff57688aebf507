//! Wikipedia lookup through the MediaWiki action API.
//!
//! A lookup is two calls: a full-text search for the best matching page
//! title, then the plain-text intro extract of that page, trimmed to the
//! requested number of sentences.

use async_trait::async_trait;
use jarvis_core::effector::Encyclopedia;
use jarvis_core::error::ToolError;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const TOOL_NAME: &str = "wikipedia";

pub struct WikipediaEncyclopedia {
    client: reqwest::Client,
    api_url: String,
}

impl WikipediaEncyclopedia {
    /// Lookups against `https://<language>.wikipedia.org`.
    pub fn new(language: &str) -> Self {
        Self::with_api_url(format!("https://{language}.wikipedia.org/w/api.php"))
    }

    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(concat!("jarvis/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn query<T: for<'de> Deserialize<'de>>(&self, params: &[(&str, &str)]) -> Result<T, ToolError> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[("action", "query"), ("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()
            .await
            .map_err(failed)?
            .error_for_status()
            .map_err(failed)?;

        response.json::<T>().await.map_err(failed)
    }

    async fn best_title(&self, query: &str) -> Result<String, ToolError> {
        let found: SearchResponse = self
            .query(&[("list", "search"), ("srsearch", query), ("srlimit", "1")])
            .await?;
        found
            .query
            .search
            .into_iter()
            .next()
            .map(|hit| hit.title)
            .ok_or_else(|| ToolError::NotFound(query.to_string()))
    }

    async fn intro(&self, title: &str) -> Result<String, ToolError> {
        let pages: ExtractResponse = self
            .query(&[
                ("prop", "extracts"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("titles", title),
            ])
            .await?;
        pages
            .query
            .pages
            .into_iter()
            .find_map(|page| page.extract.filter(|e| !e.trim().is_empty()))
            .ok_or_else(|| ToolError::NotFound(title.to_string()))
    }
}

fn failed(e: reqwest::Error) -> ToolError {
    ToolError::ExecutionFailed {
        tool_name: TOOL_NAME.into(),
        reason: e.to_string(),
    }
}

#[async_trait]
impl Encyclopedia for WikipediaEncyclopedia {
    async fn summary(&self, query: &str, sentences: usize) -> Result<String, ToolError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ToolError::InvalidArguments("empty lookup query".into()));
        }

        let title = self.best_title(query).await?;
        debug!(query = %query, title = %title, "Wikipedia page selected");
        let extract = self.intro(&title).await?;
        Ok(first_sentences(&extract, sentences.max(1)))
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    query: SearchQuery,
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Deserialize)]
struct ExtractResponse {
    query: ExtractQuery,
}

#[derive(Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Deserialize)]
struct Page {
    #[serde(default)]
    extract: Option<String>,
}

/// The first `count` sentences of `text`, whitespace collapsed.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace or the end of
/// the text. A period after a lone capital letter ("J. R. R. Tolkien") is
/// treated as an initial, not a sentence end.
pub fn first_sentences(text: &str, count: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut taken = Vec::new();
    let mut found = 0;

    for word in words {
        taken.push(word);
        if ends_sentence(word) {
            found += 1;
            if found == count {
                break;
            }
        }
    }

    taken.join(" ")
}

fn ends_sentence(word: &str) -> bool {
    let trimmed = word.trim_end_matches(['"', '\'', ')', '”', '’']);
    let Some(last) = trimmed.chars().last() else {
        return false;
    };
    match last {
        '!' | '?' => true,
        '.' => {
            let stem = &trimmed[..trimmed.len() - 1];
            let mut chars = stem.chars();
            let is_initial = matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase());
            !is_initial
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_to_sentence_count() {
        let text = "Rust is a language. It is fast! Is it safe? Yes.";
        assert_eq!(first_sentences(text, 1), "Rust is a language.");
        assert_eq!(first_sentences(text, 2), "Rust is a language. It is fast!");
        assert_eq!(first_sentences(text, 10), text);
    }

    #[test]
    fn initials_do_not_end_sentences() {
        let text = "J. R. R. Tolkien was an English writer. He wrote novels.";
        assert_eq!(first_sentences(text, 1), "J. R. R. Tolkien was an English writer.");
    }

    #[test]
    fn decimals_and_newlines() {
        let text = "Version 1.5 shipped\nin May. Another sentence.";
        assert_eq!(first_sentences(text, 1), "Version 1.5 shipped in May.");
    }

    #[test]
    fn closing_quote_after_period() {
        let text = "He said \"hello.\" Then left.";
        assert_eq!(first_sentences(text, 1), "He said \"hello.\"");
    }

    #[test]
    fn parses_search_response() {
        let body = r#"{"batchcomplete":true,"query":{"searchinfo":{"totalhits":1},
            "search":[{"ns":0,"title":"Alan Turing","pageid":1208}]}}"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.query.search[0].title, "Alan Turing");
    }

    #[test]
    fn parses_extract_response() {
        let body = r#"{"query":{"pages":[{"pageid":1208,"title":"Alan Turing",
            "extract":"Alan Mathison Turing was an English mathematician."}]}}"#;
        let parsed: ExtractResponse = serde_json::from_str(body).unwrap();
        assert_eq!(
            parsed.query.pages[0].extract.as_deref(),
            Some("Alan Mathison Turing was an English mathematician.")
        );
    }

    #[test]
    fn missing_page_has_no_extract() {
        let body = r#"{"query":{"pages":[{"title":"Nope","missing":true}]}}"#;
        let parsed: ExtractResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.query.pages[0].extract.is_none());
    }

    #[test]
    fn language_selects_host() {
        assert_eq!(
            WikipediaEncyclopedia::new("de").api_url(),
            "https://de.wikipedia.org/w/api.php"
        );
    }

    #[tokio::test]
    async fn empty_query_is_rejected_without_network() {
        let wiki = WikipediaEncyclopedia::with_api_url("http://127.0.0.1:9/unused");
        let err = wiki.summary("   ", 2).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn unreachable_api_is_an_execution_failure() {
        let wiki = WikipediaEncyclopedia::with_api_url("http://127.0.0.1:9/w/api.php");
        let err = wiki.summary("rust", 2).await.unwrap_err();
        assert!(matches!(err, ToolError::ExecutionFailed { .. }));
    }
}
