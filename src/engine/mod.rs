//! Engine catalog: known AI and search providers and query URL resolution.

mod catalog;
mod rule;

pub use catalog::ENGINES;
pub use rule::{rule_for, QueryRule, PROVIDER_RULES};

use crate::config;
use serde::{Deserialize, Serialize};
use url::Url;

/// Provider category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Ai,
    #[default]
    Search,
}

/// A provider record: catalog entry or user-defined engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engine {
    pub name: String,
    #[serde(rename = "url")]
    pub url_template: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub kind: EngineKind,
}

impl Engine {
    /// A user-defined engine outside the catalog
    pub fn custom(name: &str, url_template: &str) -> Self {
        Self {
            name: name.to_string(),
            url_template: url_template.to_string(),
            icon: None,
            kind: EngineKind::Search,
        }
    }

    fn from_entry(entry: &(&str, &str, &str, EngineKind)) -> Self {
        let (name, url, icon, kind) = *entry;
        Self {
            name: name.to_string(),
            url_template: url.to_string(),
            icon: Some(icon.to_string()),
            kind,
        }
    }

    /// Check whether the template carries the query placeholder
    pub fn has_query_placeholder(&self) -> bool {
        self.url_template.contains(config::QUERY_PLACEHOLDER)
    }

    /// Resolve the URL for `query` on this engine
    pub fn build_query(&self, query: &str) -> String {
        build_search_url(self, query)
    }

    /// Normalized key for this engine, see [`engine_key`]
    pub fn key(&self) -> String {
        engine_key(&self.name)
    }

    /// Host of the engine's URL without a leading `www.`
    pub fn domain(&self) -> Option<String> {
        let url = Url::parse(&self.url_template.replace(config::QUERY_PLACEHOLDER, "")).ok()?;
        let host = url.host_str()?;
        Some(host.strip_prefix("www.").unwrap_or(host).to_string())
    }

    /// Favicon URL for the engine's domain at the given pixel size
    pub fn favicon_url(&self, size: u32) -> String {
        let domain = self
            .domain()
            .unwrap_or_else(|| config::FALLBACK_FAVICON_DOMAIN.to_string());
        config::FAVICON_SERVICE_URL
            .replace("{domain}", &domain)
            .replace("{size}", &size.to_string())
    }
}

/// Resolve a final URL for `query` on `engine`.
///
/// Special-cased providers win, then `{query}` substitution, then the template
/// is returned as-is with the query dropped.
pub fn build_search_url(engine: &Engine, query: &str) -> String {
    if let Some(rule) = rule_for(&engine.name) {
        return rule.apply(query);
    }

    if engine.has_query_placeholder() {
        return engine
            .url_template
            .replace(config::QUERY_PLACEHOLDER, &urlencoding::encode(query));
    }

    engine.url_template.clone()
}

/// Normalized engine key: lowercase with spaces replaced by underscores
pub fn engine_key(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Look up a known provider by display name
pub fn lookup(name: &str) -> Option<Engine> {
    ENGINES
        .iter()
        .find(|(engine_name, _, _, _)| *engine_name == name)
        .map(Engine::from_entry)
}

/// Look up a known provider by display name or normalized key
pub fn lookup_by_key(key: &str) -> Option<Engine> {
    lookup(key).or_else(|| {
        let wanted = engine_key(key);
        ENGINES
            .iter()
            .find(|(engine_name, _, _, _)| engine_key(engine_name) == wanted)
            .map(Engine::from_entry)
    })
}

/// All catalog records in table order
pub fn catalog() -> impl Iterator<Item = Engine> {
    ENGINES.iter().map(Engine::from_entry)
}

/// Catalog records of one kind
pub fn engines_of_kind(kind: EngineKind) -> impl Iterator<Item = Engine> {
    catalog().filter(move |engine| engine.kind == kind)
}
