//! Per-provider query formats.
//!
//! Providers disagree on query parameter names, and some have no query
//! endpoint at all. Entries here take precedence over an engine's template.

/// How a provider turns a query into a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryRule {
    /// Fixed prefix followed by the URL-encoded query
    Prefix(&'static str),
    /// No query endpoint; always opens this page
    Landing(&'static str),
}

impl QueryRule {
    pub fn apply(&self, query: &str) -> String {
        match self {
            QueryRule::Prefix(base) => format!("{}{}", base, urlencoding::encode(query)),
            QueryRule::Landing(url) => url.to_string(),
        }
    }
}

/// Provider rule table, keyed by engine display name
pub const PROVIDER_RULES: &[(&str, QueryRule)] = &[
    ("Google", QueryRule::Prefix("https://www.google.com/search?q=")),
    ("Bing", QueryRule::Prefix("https://www.bing.com/search?q=")),
    ("百度", QueryRule::Prefix("https://www.baidu.com/s?wd=")),
    ("必应", QueryRule::Prefix("https://cn.bing.com/search?q=")),
    ("知乎", QueryRule::Prefix("https://www.zhihu.com/search?type=content&q=")),
    ("微博", QueryRule::Prefix("https://s.weibo.com/weibo?q=")),
    ("DeepSeek", QueryRule::Landing("https://chat.deepseek.com")),
    ("ChatGPT", QueryRule::Landing("https://chat.openai.com")),
    ("文心一言", QueryRule::Landing("https://yiyan.baidu.com")),
];

/// Look up the special-cased rule for a provider name
pub fn rule_for(name: &str) -> Option<QueryRule> {
    PROVIDER_RULES
        .iter()
        .find(|(provider, _)| *provider == name)
        .map(|(_, rule)| *rule)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_rule_encodes_query() {
        let rule = rule_for("百度").unwrap();
        assert_eq!(rule.apply("rust 语言"), "https://www.baidu.com/s?wd=rust%20%E8%AF%AD%E8%A8%80");
    }

    #[test]
    fn test_landing_rule_drops_query() {
        let rule = rule_for("ChatGPT").unwrap();
        assert_eq!(rule.apply("anything"), "https://chat.openai.com");
    }

    #[test]
    fn test_unknown_provider_has_no_rule() {
        assert!(rule_for("Kimi").is_none());
        assert!(rule_for("google").is_none());
    }
}
