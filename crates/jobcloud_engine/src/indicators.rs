//! Static rule tables for job-posting extraction.
//!
//! Order matters: not-found indicators are checked before any content
//! selection, and content rules are tried first to last.

/// Nodes whose text never counts as page content; removed before any check.
pub const NON_CONTENT_SELECTOR: &str = "script, style, meta, link, noscript";

/// Phrases that mark a removed, expired or filled posting. Matched
/// case-insensitively against the whole sanitized page text.
pub const NOT_FOUND_PHRASES: &[&str] = &[
    "job you're looking for isn't available",
    "job not found",
    "position no longer available",
    "job has been filled",
    "position has been closed",
    "job posting has expired",
    "this job is no longer available",
    "position is no longer open",
    "job has been removed",
    "position has been withdrawn",
    "sorry, the job you're looking for",
    "this position is no longer accepting applications",
    "job posting has been removed",
    "position has been filled",
    "job is no longer active",
    "position is no longer available",
    "job has been closed",
    "position has been cancelled",
    "job posting has been deleted",
    "position has been terminated",
];

/// Selectors for error/unavailable containers on a not-found page.
pub const NOT_FOUND_SELECTORS: &[&str] = &[
    r#"[id*="not-found"]"#,
    r#"[class*="not-found"]"#,
    r#"[id*="error"]"#,
    r#"[class*="error"]"#,
    r#"[id*="unavailable"]"#,
    r#"[class*="unavailable"]"#,
    r#"[id*="expired"]"#,
    r#"[class*="expired"]"#,
    r#"[id*="closed"]"#,
    r#"[class*="closed"]"#,
    r#"[id*="filled"]"#,
    r#"[class*="filled"]"#,
    r#"[id*="removed"]"#,
    r#"[class*="removed"]"#,
    r#"[id*="404"]"#,
    r#"[class*="404"]"#,
];

/// A not-found selector only counts when the matched element carries more
/// than this many characters of text.
pub const NOT_FOUND_MIN_CHARS: usize = 10;

/// Extracted text shorter than this is reported as empty content.
pub const MIN_CONTENT_CHARS: usize = 50;

/// One step of content isolation: the longest element matching `selector`
/// is accepted when its text is longer than `min_chars`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentRule {
    pub selector: &'static str,
    pub min_chars: usize,
}

impl ContentRule {
    const fn new(selector: &'static str) -> Self {
        Self {
            selector,
            min_chars: 100,
        }
    }

    pub fn accepts(&self, text_chars: usize) -> bool {
        text_chars > self.min_chars
    }
}

/// Specific job/description containers first, generic page regions last.
pub const CONTENT_RULES: &[ContentRule] = &[
    ContentRule::new(r#"[data-testid*="job"]"#),
    ContentRule::new(r#"[class*="job"]"#),
    ContentRule::new(r#"[class*="description"]"#),
    ContentRule::new(r#"[id*="job"]"#),
    ContentRule::new(r#"[id*="description"]"#),
    ContentRule::new("main"),
    ContentRule::new("article"),
    ContentRule::new(".content"),
    ContentRule::new("#content"),
    ContentRule::new(".job-description"),
    ContentRule::new("#job-description"),
];
