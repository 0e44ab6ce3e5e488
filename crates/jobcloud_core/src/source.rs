use std::fmt;

use serde::Serialize;

/// Why a single source produced no usable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SourceFailureKind {
    /// Navigation, protocol or driver failure while rendering the page.
    Render,
    /// The page rendered but looks like a removed/expired/filled posting.
    NotFound,
    /// The page rendered but too little text survived extraction.
    EmptyContent,
}

impl fmt::Display for SourceFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceFailureKind::Render => write!(f, "render error"),
            SourceFailureKind::NotFound => write!(f, "posting not found"),
            SourceFailureKind::EmptyContent => write!(f, "empty content"),
        }
    }
}

/// Extraction outcome for one source: either text or a failure, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SourceOutcome {
    Text(String),
    Failure {
        kind: SourceFailureKind,
        detail: String,
    },
}

impl SourceOutcome {
    pub fn failure(kind: SourceFailureKind, detail: impl Into<String>) -> Self {
        SourceOutcome::Failure {
            kind,
            detail: detail.into(),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            SourceOutcome::Text(text) => Some(text),
            SourceOutcome::Failure { .. } => None,
        }
    }

    pub fn failure_kind(&self) -> Option<SourceFailureKind> {
        match self {
            SourceOutcome::Text(_) => None,
            SourceOutcome::Failure { kind, .. } => Some(*kind),
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, SourceOutcome::Text(_))
    }
}

/// Outcome of scraping one accepted input URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceResult {
    /// Source identity: the full input URL.
    pub identity: String,
    /// Host component of the URL, for display. Empty if the URL does not parse.
    pub host: String,
    pub outcome: SourceOutcome,
}

impl SourceResult {
    pub fn new(url: &str, outcome: SourceOutcome) -> Self {
        Self {
            identity: url.to_string(),
            host: crate::source_host(url).unwrap_or_default(),
            outcome,
        }
    }
}

/// Ordered collection of per-source results, one entry per distinct accepted URL.
///
/// Entries keep the order in which their identity was first recorded. Recording
/// an identity a second time replaces the outcome in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScrapeBatchResult {
    entries: Vec<SourceResult>,
}

impl ScrapeBatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: SourceResult) {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.identity == result.identity)
        {
            Some(existing) => *existing = result,
            None => self.entries.push(result),
        }
    }

    pub fn get(&self, identity: &str) -> Option<&SourceResult> {
        self.entries.iter().find(|entry| entry.identity == identity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceResult> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Texts of successful sources, in batch order.
    pub fn texts(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|entry| entry.outcome.text())
            .collect()
    }

    pub fn success_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.outcome.is_text())
            .count()
    }

    pub fn failure_count(&self) -> usize {
        self.len() - self.success_count()
    }
}

impl<'a> IntoIterator for &'a ScrapeBatchResult {
    type Item = &'a SourceResult;
    type IntoIter = std::slice::Iter<'a, SourceResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
