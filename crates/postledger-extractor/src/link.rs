//! Link pattern and matcher

use regex::Regex;
use std::sync::OnceLock;

/// Regular expression for a post reference
///
/// The numeric id must end on a word boundary, otherwise `/123abc` would be
/// cut short at `/123`; in that case the whole segment is taken as the
/// sub-path instead.
pub const LINK_PATTERN: &str =
    r"https?://(?:t\.me|telegram\.me)/[A-Za-z0-9_]+(?:/[0-9]+\b)?(?:/[A-Za-z0-9_]+)?";

/// Compiled link matcher
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    pattern: Regex,
}

impl LinkExtractor {
    /// Compile the link pattern
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(LINK_PATTERN).expect("LINK_PATTERN is a valid regex"),
        }
    }

    /// Shared instance, compiled on first use
    pub fn shared() -> &'static LinkExtractor {
        static SHARED: OnceLock<LinkExtractor> = OnceLock::new();
        SHARED.get_or_init(LinkExtractor::new)
    }

    /// Return the first post link in `text`
    pub fn extract(&self, text: &str) -> Option<String> {
        self.pattern.find(text).map(|m| m.as_str().to_string())
    }

    /// Whether `text` contains a post link
    pub fn contains_link(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

impl Default for LinkExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Return the first post link in `text`, using the shared extractor
pub fn extract_link(text: &str) -> Option<String> {
    LinkExtractor::shared().extract(text)
}
