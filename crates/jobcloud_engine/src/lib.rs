//! Jobcloud engine: page rendering, posting extraction, batch scraping and
//! execution of the core pipeline's effects.
mod chrome;
mod decode;
mod extract;
mod indicators;
mod persist;
mod pipeline;
mod render;
mod scrape;
mod static_render;
mod types;

pub use chrome::{ChromeRenderer, ChromeSession};
pub use extract::{Extractor, JobPostingExtractor};
pub use indicators::{
    ContentRule, CONTENT_RULES, MIN_CONTENT_CHARS, NON_CONTENT_SELECTOR, NOT_FOUND_MIN_CHARS,
    NOT_FOUND_PHRASES, NOT_FOUND_SELECTORS,
};
pub use persist::{ensure_output_dir, persist_corpus, PersistError};
pub use pipeline::Orchestrator;
pub use render::{RenderSession, RenderSettings, Renderer, DESKTOP_USER_AGENT};
pub use scrape::{BatchScraper, BatchSettings, LogProgressSink, NullProgressSink, ProgressSink};
pub use static_render::{FetchSettings, StaticRenderer, StaticSession};
pub use types::{EngineEvent, RenderError, RenderFailureKind, SourceProgress, Stage};
