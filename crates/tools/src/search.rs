use jarvis_core::error::ToolError;
use reqwest::Url;

/// Build a search-engine URL for `query`, e.g.
/// `https://www.google.com/search?q=rust+async`.
pub fn search_url(base: &str, query: &str) -> Result<String, ToolError> {
    Url::parse_with_params(base, &[("q", query)])
        .map(String::from)
        .map_err(|e| ToolError::InvalidArguments(format!("bad search URL '{base}': {e}")))
}
