use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Render and extract each URL, in order, then report `Msg::ScrapeCompleted`.
    ScrapeUrls { urls: Vec<String> },
    /// Write `corpus` to `dir/filename`, then report `Msg::CorpusPersisted`.
    PersistCorpus {
        dir: PathBuf,
        filename: String,
        corpus: String,
    },
}
