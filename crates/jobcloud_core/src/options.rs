use std::ops::RangeInclusive;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

pub const N_GRAM_RANGE: RangeInclusive<usize> = 1..=3;
pub const MAX_WORDS_RANGE: RangeInclusive<usize> = 10..=200;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    #[error("n-gram size {0} is outside 1..=3")]
    NGramSize(usize),
    #[error("max words {0} is outside 10..=200")]
    MaxWords(usize),
}

/// Recognized options for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineOptions {
    n_gram_size: usize,
    min_frequency: u32,
    max_words: usize,
    output_dir: Option<PathBuf>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            n_gram_size: 1,
            min_frequency: 2,
            max_words: 50,
            output_dir: None,
        }
    }
}

impl PipelineOptions {
    /// A `min_frequency` of zero is stored as one.
    pub fn new(
        n_gram_size: usize,
        min_frequency: u32,
        max_words: usize,
    ) -> Result<Self, OptionsError> {
        if !N_GRAM_RANGE.contains(&n_gram_size) {
            return Err(OptionsError::NGramSize(n_gram_size));
        }
        if !MAX_WORDS_RANGE.contains(&max_words) {
            return Err(OptionsError::MaxWords(max_words));
        }
        Ok(Self {
            n_gram_size,
            min_frequency: min_frequency.max(1),
            max_words,
            output_dir: None,
        })
    }

    /// Persist the combined corpus into `dir` once scraping succeeds.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn n_gram_size(&self) -> usize {
        self.n_gram_size
    }

    pub fn min_frequency(&self) -> u32 {
        self.min_frequency
    }

    /// Cap for downstream word-cloud rendering; not applied by the pipeline.
    pub fn max_words(&self) -> usize {
        self.max_words
    }

    pub fn output_dir(&self) -> Option<&PathBuf> {
        self.output_dir.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(PipelineOptions::new(4, 1, 50), Err(OptionsError::NGramSize(4)));
        assert_eq!(PipelineOptions::new(0, 1, 50), Err(OptionsError::NGramSize(0)));
        assert_eq!(PipelineOptions::new(1, 1, 9), Err(OptionsError::MaxWords(9)));
        assert_eq!(PipelineOptions::new(1, 1, 201), Err(OptionsError::MaxWords(201)));
    }

    #[test]
    fn zero_min_frequency_becomes_one() {
        let options = PipelineOptions::new(2, 0, 10).unwrap();
        assert_eq!(options.min_frequency(), 1);
        assert_eq!(options.n_gram_size(), 2);
        assert_eq!(options.output_dir(), None);
    }
}
