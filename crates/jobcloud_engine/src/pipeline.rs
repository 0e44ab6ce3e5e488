use std::collections::VecDeque;
use std::time::Instant;

use engine_logging::{engine_info, engine_warn};
use jobcloud_core::{update, Effect, Msg, PipelineOptions, PipelineResult, PipelineState};

use crate::extract::{Extractor, JobPostingExtractor};
use crate::persist::persist_corpus;
use crate::render::Renderer;
use crate::scrape::{BatchScraper, ProgressSink};

/// Drives the core pipeline state machine and executes its effects.
pub struct Orchestrator<R, E = JobPostingExtractor> {
    scraper: BatchScraper<R, E>,
}

impl<R: Renderer, E: Extractor> Orchestrator<R, E> {
    pub fn new(scraper: BatchScraper<R, E>) -> Self {
        Self { scraper }
    }

    /// Run validate -> scrape -> aggregate (-> persist) for `urls`.
    ///
    /// Always returns a result; failures are described in it together with
    /// whatever was gathered before the failing stage.
    pub async fn run(
        &self,
        urls: Vec<String>,
        options: PipelineOptions,
        sink: &dyn ProgressSink,
    ) -> PipelineResult {
        let started = Instant::now();
        let mut state = PipelineState::new(options);
        let mut pending = VecDeque::from([Msg::UrlsSubmitted(urls)]);

        while let Some(msg) = pending.pop_front() {
            let (next, effects) = update(state, msg);
            state = next;
            engine_info!("Pipeline stage: {:?}", state.stage());
            for effect in effects {
                pending.push_back(self.execute(effect, sink).await);
            }
        }

        let result = state.into_result();
        if result.success {
            engine_info!("{} ({:?})", result.message, started.elapsed());
        } else {
            engine_warn!("{} ({:?})", result.message, started.elapsed());
        }
        result
    }

    async fn execute(&self, effect: Effect, sink: &dyn ProgressSink) -> Msg {
        match effect {
            Effect::ScrapeUrls { urls } => {
                engine_info!("Scraping {} URL(s)", urls.len());
                Msg::ScrapeCompleted(self.scraper.scrape_all(&urls, sink).await)
            }
            Effect::PersistCorpus {
                dir,
                filename,
                corpus,
            } => {
                let outcome = persist_corpus(&dir, &filename, &corpus).map_err(|err| {
                    engine_warn!("Failed to save corpus to {:?}: {}", dir, err);
                    err.to_string()
                });
                Msg::CorpusPersisted(outcome)
            }
        }
    }
}
