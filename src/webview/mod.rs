//! Load policy for the assistant's web content surface.
//!
//! Rendering belongs to the platform WebView. This decides what it is asked
//! to load and which sub-requests it should drop.

use crate::content_filter::ContentFilter;
use crate::engine::Engine;
use crate::url_bar;
use std::cell::Cell;
use url::Url;

/// What the WebView should do with resolved input
#[derive(Debug, Clone, PartialEq)]
pub enum LoadDecision {
    Load(Url),
    Blocked(Url),
    /// Input resolved to something that is not a URL
    Invalid(String),
}

/// Resolves input against the current engine and applies the content filter
#[derive(Debug)]
pub struct PageLoader {
    filter: ContentFilter,
    engine: Engine,
    blocked_requests: Cell<usize>,
}

impl PageLoader {
    pub fn new(filter: ContentFilter, engine: Engine) -> Self {
        Self {
            filter,
            engine,
            blocked_requests: Cell::new(0),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn set_engine(&mut self, engine: Engine) {
        log::debug!("Page loader engine set to {}", engine.name);
        self.engine = engine;
    }

    pub fn filter(&self) -> &ContentFilter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut ContentFilter {
        &mut self.filter
    }

    /// Decide the top-level navigation for what the user typed
    pub fn load(&self, input: &str) -> LoadDecision {
        let url = match url_bar::resolve_input(input, &self.engine) {
            Ok(url) => url,
            Err(e) => {
                log::warn!("Could not resolve '{}' with {}: {}", input, self.engine.name, e);
                return LoadDecision::Invalid(e.to_string());
            }
        };

        if self.intercept_request(url.as_str()) {
            LoadDecision::Blocked(url)
        } else {
            log::debug!("Loading {}", url);
            LoadDecision::Load(url)
        }
    }

    /// Request hook: true when the request must not be made
    pub fn intercept_request(&self, url: &str) -> bool {
        let blocked = self.filter.should_block(url);
        if blocked {
            self.blocked_requests.set(self.blocked_requests.get() + 1);
        }
        blocked
    }

    /// Requests blocked since creation or the last reset
    pub fn blocked_requests(&self) -> usize {
        self.blocked_requests.get()
    }

    pub fn reset_blocked_requests(&self) {
        self.blocked_requests.set(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine;

    fn loader(engine_name: &str) -> PageLoader {
        PageLoader::new(ContentFilter::new(), engine::lookup(engine_name).unwrap())
    }

    #[test]
    fn test_search_loads_engine_url() {
        let loader = loader("Google");
        match loader.load("rust ownership") {
            LoadDecision::Load(url) => {
                assert_eq!(url.as_str(), "https://www.google.com/search?q=rust%20ownership")
            }
            other => panic!("Expected load, got {:?}", other),
        }
        assert_eq!(loader.blocked_requests(), 0);
    }

    #[test]
    fn test_blocked_navigation_counts() {
        let loader = loader("Google");
        assert!(matches!(
            loader.load("https://ad.doubleclick.net/landing"),
            LoadDecision::Blocked(_)
        ));
        assert!(loader.intercept_request("https://www.google-analytics.com/collect"));
        assert!(!loader.intercept_request("https://www.google.com/logo.png"));
        assert_eq!(loader.blocked_requests(), 2);

        loader.reset_blocked_requests();
        assert_eq!(loader.blocked_requests(), 0);
    }

    #[test]
    fn test_invalid_custom_template() {
        let loader = PageLoader::new(
            ContentFilter::new(),
            Engine::custom("Broken", "no scheme {query}"),
        );
        assert!(matches!(loader.load("cats"), LoadDecision::Invalid(_)));
    }

    #[test]
    fn test_switch_engine() {
        let mut loader = loader("Google");
        loader.set_engine(engine::lookup("百度").unwrap());
        assert_eq!(
            loader.load("rust"),
            LoadDecision::Load(Url::parse("https://www.baidu.com/s?wd=rust").unwrap())
        );
    }

    #[test]
    fn test_disabled_filter_allows() {
        let mut loader = loader("Google");
        loader.filter_mut().set_enabled(false);
        assert!(!loader.intercept_request("https://doubleclick.net/x"));
        assert!(!loader.filter().is_enabled());
    }
}
