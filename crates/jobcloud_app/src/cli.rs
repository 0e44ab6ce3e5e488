use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use jobcloud_core::{parse_url_lines, PipelineOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RendererKind {
    /// Headless Chrome; runs page scripts before extraction.
    Chrome,
    /// Plain HTTP GET; no scripts are executed.
    Static,
}

#[derive(Parser, Debug)]
#[command(
    name = "jobcloud",
    about = "Scrape job postings and report the most frequent terms across them",
    version,
    long_about = None
)]
pub struct Args {
    /// Job posting URLs to scrape
    pub urls: Vec<String>,

    /// Read additional URLs from a file, one per line ("-" for stdin)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Words per term (1 = single words, 2 = bigrams, 3 = trigrams)
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=3))]
    pub ngram: u8,

    /// Minimum number of occurrences for a term to be kept
    #[arg(short, long, default_value_t = 2)]
    pub min_frequency: u32,

    /// Number of top terms to show
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u16).range(10..=200))]
    pub max_words: u16,

    /// Save the combined descriptions to this directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// How pages are loaded
    #[arg(long, value_enum, default_value_t = RendererKind::Chrome)]
    pub renderer: RendererKind,

    /// RON file with renderer timings and identity overrides
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Print the full result as JSON instead of the text report
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Also write the log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Args {
    pub fn pipeline_options(&self) -> Result<PipelineOptions> {
        let options = PipelineOptions::new(
            usize::from(self.ngram),
            self.min_frequency,
            usize::from(self.max_words),
        )?;
        Ok(match &self.output_dir {
            Some(dir) => options.with_output_dir(dir),
            None => options,
        })
    }

    /// Positional URLs followed by those read from `--file`, in order.
    pub fn collect_urls(&self) -> Result<Vec<String>> {
        let mut urls: Vec<String> = self.urls.iter().map(|u| u.trim().to_string()).collect();
        if let Some(path) = &self.file {
            let raw = if path.as_os_str() == "-" {
                let mut buf = String::new();
                io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read URLs from stdin")?;
                buf
            } else {
                fs::read_to_string(path)
                    .with_context(|| format!("Failed to read URL file {path:?}"))?
            };
            urls.extend(parse_url_lines(&raw));
        }
        Ok(urls)
    }
}
