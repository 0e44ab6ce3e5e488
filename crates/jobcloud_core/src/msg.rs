use std::path::PathBuf;

use crate::ScrapeBatchResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Raw input URLs, in the order the user gave them.
    UrlsSubmitted(Vec<String>),
    /// The batch scraper finished every accepted URL.
    ScrapeCompleted(ScrapeBatchResult),
    /// Outcome of writing the combined corpus to the output directory.
    CorpusPersisted(Result<PathBuf, String>),
}
