//! Content filtering module for ad/tracker blocking.
//!
//! Decides whether a request URL should be loaded. Rules are plain substring
//! matches on the lowercased URL, checked in a fixed order: allow list, user
//! block list, then the built-in domain, path, suffix and tracking-parameter
//! patterns.

mod builtin;
mod parser;

pub use parser::FilterRule;

use crate::config::ContentFilterConfig;
use std::collections::BTreeSet;
use std::fs;

/// Why a URL was blocked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    Custom,
    AdDomain,
    AdPath,
    AdScript,
    TrackingParam,
}

#[derive(Debug, Clone)]
pub struct ContentFilter {
    enabled: bool,
    block_rules: BTreeSet<String>,
    allow_rules: BTreeSet<String>,
}

impl Default for ContentFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentFilter {
    /// Enabled filter with only the built-in patterns
    pub fn new() -> Self {
        Self {
            enabled: true,
            block_rules: BTreeSet::new(),
            allow_rules: BTreeSet::new(),
        }
    }

    /// Build a filter from config, reading its filter lists
    pub fn from_config(config: &ContentFilterConfig) -> Self {
        let mut filter = Self::new();
        filter.set_enabled(config.enabled);

        for rule in &config.block {
            filter.add_block_rule(rule);
        }
        for rule in &config.allow {
            filter.add_allow_rule(rule);
        }

        for path in &config.filter_lists {
            match fs::read_to_string(path) {
                Ok(text) => {
                    let count = filter.load_rules(&text);
                    log::info!("Loaded {} filter rules from {:?}", count, path);
                }
                Err(e) => {
                    log::warn!("Failed to read filter list {:?}: {}", path, e);
                }
            }
        }

        filter
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        log::debug!("Content filter {}", if enabled { "enabled" } else { "disabled" });
    }

    pub fn add_block_rule(&mut self, rule: &str) {
        let rule = rule.trim().to_lowercase();
        if !rule.is_empty() {
            self.block_rules.insert(rule);
        }
    }

    pub fn remove_block_rule(&mut self, rule: &str) -> bool {
        self.block_rules.remove(&rule.trim().to_lowercase())
    }

    pub fn add_allow_rule(&mut self, rule: &str) {
        let rule = rule.trim().to_lowercase();
        if !rule.is_empty() {
            self.allow_rules.insert(rule);
        }
    }

    pub fn remove_allow_rule(&mut self, rule: &str) -> bool {
        self.allow_rules.remove(&rule.trim().to_lowercase())
    }

    /// Add every rule in a filter list; returns how many were added
    pub fn load_rules(&mut self, text: &str) -> usize {
        let mut added = 0;
        for rule in FilterRule::parse_list(text) {
            let inserted = match rule {
                FilterRule::Block(pattern) => self.block_rules.insert(pattern),
                FilterRule::Allow(pattern) => self.allow_rules.insert(pattern),
            };
            if inserted {
                added += 1;
            }
        }
        added
    }

    pub fn should_block(&self, url: &str) -> bool {
        self.block_reason(url).is_some()
    }

    /// Check a URL and report which rule set matched
    pub fn block_reason(&self, url: &str) -> Option<BlockReason> {
        if !self.enabled {
            return None;
        }

        let url = url.to_lowercase();

        if self.allow_rules.iter().any(|rule| url.contains(rule.as_str())) {
            return None;
        }

        let reason = if self.block_rules.iter().any(|rule| url.contains(rule.as_str())) {
            Some(BlockReason::Custom)
        } else if builtin::AD_DOMAINS.iter().any(|d| url.contains(d)) {
            Some(BlockReason::AdDomain)
        } else if builtin::AD_PATHS.iter().any(|p| url.contains(p)) {
            Some(BlockReason::AdPath)
        } else if Self::has_ad_suffix(&url) {
            Some(BlockReason::AdScript)
        } else if Self::has_tracking_param(&url) {
            Some(BlockReason::TrackingParam)
        } else {
            None
        };

        if let Some(reason) = reason {
            log::debug!("Blocked {:?}: {}", reason, url);
        }
        reason
    }

    fn has_ad_suffix(url: &str) -> bool {
        // Ignore query and fragment when looking at the file name
        let path = url.split(['?', '#']).next().unwrap_or(url);
        builtin::AD_SUFFIXES.iter().any(|suffix| path.ends_with(suffix))
    }

    fn has_tracking_param(url: &str) -> bool {
        let Some((_, query)) = url.split_once('?') else {
            return false;
        };
        let query = query.split('#').next().unwrap_or(query);

        query.split('&').any(|pair| {
            let name = pair.split('=').next().unwrap_or(pair);
            builtin::TRACKING_PARAMS.contains(&name)
        })
    }
}
