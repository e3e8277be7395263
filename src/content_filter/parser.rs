//! Parser for simple filter lists
//!
//! Understands a small subset of Adblock syntax:
//! `! comment`, `@@pattern` (allow), `||example.com^` (block host), and bare
//! substrings (block).

/// A parsed filter line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterRule {
    Block(String),
    Allow(String),
}

impl FilterRule {
    /// Parse one filter line. Returns None for comments, blank lines, and
    /// cosmetic (`##`) rules.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();

        if line.is_empty() || line.starts_with('!') || line.starts_with('[') {
            return None;
        }

        // Element hiding needs a DOM, not a request filter
        if line.contains("##") || line.contains("#@#") {
            return None;
        }

        let (allow, body) = match line.strip_prefix("@@") {
            Some(rest) => (true, rest),
            None => (false, line),
        };

        let pattern = Self::normalize_pattern(body)?;

        Some(if allow {
            FilterRule::Allow(pattern)
        } else {
            FilterRule::Block(pattern)
        })
    }

    /// Strip anchors and options, lowercase the rest
    fn normalize_pattern(body: &str) -> Option<String> {
        // Drop `$third-party` style options
        let body = body.split('$').next().unwrap_or_default();

        let body = body.strip_prefix("||").unwrap_or(body);
        let body = body.strip_prefix('|').unwrap_or(body);
        let body = body.trim_end_matches(['^', '|']);

        let pattern = body.trim().to_lowercase();
        if pattern.is_empty() || pattern == "*" {
            None
        } else {
            Some(pattern)
        }
    }

    /// Parse every rule in a filter list
    pub fn parse_list(text: &str) -> Vec<Self> {
        text.lines().filter_map(Self::parse).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_host_anchor() {
        assert_eq!(
            FilterRule::parse("||Ads.Example.com^"),
            Some(FilterRule::Block("ads.example.com".to_string()))
        );
    }

    #[test]
    fn test_parse_allow() {
        assert_eq!(
            FilterRule::parse("@@||example.com/ads/ok^"),
            Some(FilterRule::Allow("example.com/ads/ok".to_string()))
        );
    }

    #[test]
    fn test_parse_strips_options() {
        assert_eq!(
            FilterRule::parse("||tracker.example^$third-party,script"),
            Some(FilterRule::Block("tracker.example".to_string()))
        );
    }

    #[test]
    fn test_skip_comment_and_cosmetic() {
        assert!(FilterRule::parse("! Title: list").is_none());
        assert!(FilterRule::parse("[Adblock Plus 2.0]").is_none());
        assert!(FilterRule::parse("example.com##.banner").is_none());
        assert!(FilterRule::parse("   ").is_none());
        assert!(FilterRule::parse("||^").is_none());
    }

    #[test]
    fn test_parse_list() {
        let rules = FilterRule::parse_list("! header\n/banner-ads/\n\n@@safe.example\n");
        assert_eq!(
            rules,
            vec![
                FilterRule::Block("/banner-ads/".to_string()),
                FilterRule::Allow("safe.example".to_string()),
            ]
        );
    }
}
