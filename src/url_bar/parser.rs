use crate::engine::{self, Engine};
use url::Url;

/// Result of parsing assistant input
#[derive(Debug, Clone, PartialEq)]
pub enum UrlBarInput {
    /// A valid URL to navigate to
    Url(Url),
    /// A query for the search engine
    Search(String),
}

/// Parse what the user typed into the floating search box
///
/// Rules:
/// 1. If input already has an http, https or file scheme, use as-is
/// 2. If input looks like a host (contains dot, no spaces, no `?`), prepend https://
/// 3. `localhost` maps to http://localhost/
/// 4. Otherwise, treat as a query
pub fn parse_input(input: &str) -> UrlBarInput {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return UrlBarInput::Search(String::new());
    }

    if let Ok(url) = Url::parse(trimmed) {
        if matches!(url.scheme(), "http" | "https" | "file") {
            return UrlBarInput::Url(url);
        }
    }

    if !trimmed.contains(char::is_whitespace) && !trimmed.contains('?') && trimmed.contains('.') {
        if let Ok(url) = Url::parse(&format!("https://{}", trimmed)) {
            if url.host_str().is_some() {
                return UrlBarInput::Url(url);
            }
        }
    }

    if trimmed.eq_ignore_ascii_case("localhost") {
        if let Ok(url) = Url::parse("http://localhost") {
            return UrlBarInput::Url(url);
        }
    }

    UrlBarInput::Search(trimmed.to_string())
}

/// Build the search URL for `query` on `engine`
pub fn build_search_url(engine: &Engine, query: &str) -> Result<Url, url::ParseError> {
    Url::parse(&engine::build_search_url(engine, query))
}

/// Turn input into the URL to open: URLs pass through, queries go to `engine`
pub fn resolve_input(input: &str, engine: &Engine) -> Result<Url, url::ParseError> {
    match parse_input(input) {
        UrlBarInput::Url(url) => Ok(url),
        UrlBarInput::Search(query) => build_search_url(engine, &query),
    }
}
