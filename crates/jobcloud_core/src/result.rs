use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::{ScrapeBatchResult, TokenFrequencyMap};

/// Stage at which a pipeline run gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PipelineFailure {
    NoValidUrls,
    NoSuccessfulScrape,
    EmptyFrequency,
}

impl fmt::Display for PipelineFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineFailure::NoValidUrls => write!(f, "no valid urls"),
            PipelineFailure::NoSuccessfulScrape => write!(f, "no successful scrape"),
            PipelineFailure::EmptyFrequency => write!(f, "empty frequency map"),
        }
    }
}

/// Terminal output of one pipeline run.
///
/// Everything computed before a failure stays attached so callers can show
/// partial diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineResult {
    pub success: bool,
    pub message: String,
    pub failure: Option<PipelineFailure>,
    pub frequencies: TokenFrequencyMap,
    pub corpus: String,
    pub batch: ScrapeBatchResult,
    /// Inputs that failed the `http://`/`https://` prefix check.
    pub rejected_urls: Vec<String>,
    /// Passed through for the word-cloud renderer.
    pub max_words: usize,
    pub corpus_file: Option<PathBuf>,
}

impl PipelineResult {
    /// Entries a word cloud would show: the top `max_words` by frequency.
    pub fn cloud_terms(&self) -> Vec<(&str, u32)> {
        self.frequencies.top(self.max_words)
    }
}
