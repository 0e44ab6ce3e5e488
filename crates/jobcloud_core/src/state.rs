use std::path::PathBuf;

use crate::{PipelineFailure, PipelineOptions, PipelineResult, ScrapeBatchResult, TokenFrequencyMap};

pub const CORPUS_FILENAME: &str = "combined_job_descriptions.txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineStage {
    #[default]
    Start,
    Scraping,
    Persisting,
    Finished,
}

/// Everything a pipeline run has gathered so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineState {
    options: PipelineOptions,
    stage: PipelineStage,
    accepted_urls: Vec<String>,
    rejected_urls: Vec<String>,
    batch: ScrapeBatchResult,
    corpus: String,
    frequencies: TokenFrequencyMap,
    failure: Option<PipelineFailure>,
    corpus_file: Option<PathBuf>,
    persist_error: Option<String>,
}

impl PipelineState {
    pub fn new(options: PipelineOptions) -> Self {
        Self {
            options,
            stage: PipelineStage::Start,
            accepted_urls: Vec::new(),
            rejected_urls: Vec::new(),
            batch: ScrapeBatchResult::new(),
            corpus: String::new(),
            frequencies: TokenFrequencyMap::default(),
            failure: None,
            corpus_file: None,
            persist_error: None,
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn is_finished(&self) -> bool {
        self.stage == PipelineStage::Finished
    }

    pub fn accepted_urls(&self) -> &[String] {
        &self.accepted_urls
    }

    pub fn rejected_urls(&self) -> &[String] {
        &self.rejected_urls
    }

    pub fn batch(&self) -> &ScrapeBatchResult {
        &self.batch
    }

    pub fn corpus(&self) -> &str {
        &self.corpus
    }

    pub fn frequencies(&self) -> &TokenFrequencyMap {
        &self.frequencies
    }

    pub fn failure(&self) -> Option<PipelineFailure> {
        self.failure
    }

    pub(crate) fn set_stage(&mut self, stage: PipelineStage) {
        self.stage = stage;
    }

    pub(crate) fn set_urls(&mut self, accepted: Vec<String>, rejected: Vec<String>) {
        self.accepted_urls = accepted;
        self.rejected_urls = rejected;
    }

    pub(crate) fn set_batch(&mut self, batch: ScrapeBatchResult) {
        self.batch = batch;
    }

    pub(crate) fn set_corpus(&mut self, corpus: String) {
        self.corpus = corpus;
    }

    pub(crate) fn set_frequencies(&mut self, frequencies: TokenFrequencyMap) {
        self.frequencies = frequencies;
    }

    pub(crate) fn fail(&mut self, failure: PipelineFailure) {
        self.failure = Some(failure);
    }

    pub(crate) fn apply_persisted(&mut self, outcome: Result<PathBuf, String>) {
        match outcome {
            Ok(path) => self.corpus_file = Some(path),
            Err(err) => self.persist_error = Some(err),
        }
    }

    /// Package the run into its terminal result. Meaningful once finished.
    pub fn into_result(self) -> PipelineResult {
        let message = self.message();
        PipelineResult {
            success: self.failure.is_none() && self.stage == PipelineStage::Finished,
            message,
            failure: self.failure,
            frequencies: self.frequencies,
            corpus: self.corpus,
            batch: self.batch,
            rejected_urls: self.rejected_urls,
            max_words: self.options.max_words(),
            corpus_file: self.corpus_file,
        }
    }

    fn message(&self) -> String {
        let mut message = match self.failure {
            Some(PipelineFailure::NoValidUrls) if self.rejected_urls.is_empty() => {
                "No URLs provided.".to_string()
            }
            Some(PipelineFailure::NoValidUrls) => format!(
                "No valid URLs found; {} input(s) lacked an http:// or https:// prefix.",
                self.rejected_urls.len()
            ),
            Some(PipelineFailure::NoSuccessfulScrape) => format!(
                "No content was successfully scraped from {} URL(s).",
                self.accepted_urls.len()
            ),
            Some(PipelineFailure::EmptyFrequency) => format!(
                "Scraped {} of {} URL(s), but no tokens reached the minimum frequency of {}.",
                self.batch.success_count(),
                self.accepted_urls.len(),
                self.options.min_frequency()
            ),
            None if self.stage == PipelineStage::Finished => format!(
                "Processed {} of {} URL(s) and found {} unique token(s).",
                self.batch.success_count(),
                self.accepted_urls.len(),
                self.frequencies.len()
            ),
            None => format!("Pipeline stopped while {:?}.", self.stage),
        };
        if self.failure != Some(PipelineFailure::NoValidUrls) && !self.rejected_urls.is_empty() {
            message.push_str(&format!(
                " Skipped {} invalid URL(s).",
                self.rejected_urls.len()
            ));
        }
        if let Some(err) = &self.persist_error {
            message.push_str(&format!(" Corpus was not saved: {err}"));
        }
        message
    }
}
