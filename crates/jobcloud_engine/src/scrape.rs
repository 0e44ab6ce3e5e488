use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use futures_util::FutureExt;
use jobcloud_core::{
    is_accepted_url, ScrapeBatchResult, SourceFailureKind, SourceOutcome, SourceResult,
};

use crate::extract::{Extractor, JobPostingExtractor};
use crate::render::{RenderSession, Renderer};
use crate::{EngineEvent, RenderError, RenderFailureKind, SourceProgress, Stage};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn emit(&self, _event: EngineEvent) {}
}

/// Reports per-source starts and outcomes through the logger.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn emit(&self, event: EngineEvent) {
        match event {
            EngineEvent::SourceStarted { index, url } => {
                engine_info!("[{}] Scraping {}", index + 1, url);
            }
            EngineEvent::SourceCompleted {
                index,
                url,
                failure: None,
            } => {
                engine_info!("[{}] Extracted text from {}", index + 1, url);
            }
            EngineEvent::SourceCompleted {
                index,
                url,
                failure: Some(kind),
            } => {
                engine_warn!("[{}] {} failed: {}", index + 1, url, kind);
            }
            EngineEvent::Progress(_) => {}
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BatchSettings {
    /// Pause between consecutive URLs; zero disables it.
    pub delay_between: Duration,
}

/// Scrapes URLs one at a time through a single render session.
pub struct BatchScraper<R, E = JobPostingExtractor> {
    renderer: R,
    extractor: E,
    settings: BatchSettings,
}

impl<R: Renderer> BatchScraper<R, JobPostingExtractor> {
    pub fn new(renderer: R) -> Self {
        Self::with_extractor(renderer, JobPostingExtractor)
    }
}

impl<R: Renderer, E: Extractor> BatchScraper<R, E> {
    pub fn with_extractor(renderer: R, extractor: E) -> Self {
        Self {
            renderer,
            extractor,
            settings: BatchSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: BatchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Scrape every `http://`/`https://` URL in order; other inputs are skipped.
    ///
    /// Each accepted URL gets exactly one entry. A failure or panic on one URL
    /// is recorded for that URL and the batch moves on. The render session is
    /// opened once and closed once, after the last URL.
    pub async fn scrape_all(&self, urls: &[String], sink: &dyn ProgressSink) -> ScrapeBatchResult {
        let accepted: Vec<&str> = urls
            .iter()
            .map(String::as_str)
            .filter(|url| is_accepted_url(url))
            .collect();
        let mut batch = ScrapeBatchResult::new();
        if accepted.is_empty() {
            return batch;
        }
        for (index, _) in accepted.iter().enumerate() {
            sink.emit(EngineEvent::Progress(SourceProgress {
                index,
                stage: Stage::Queued,
            }));
        }

        let opened = AssertUnwindSafe(self.renderer.open())
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(RenderError::new(
                    RenderFailureKind::Launch,
                    format!("unexpected fault: {}", panic_message(panic.as_ref())),
                ))
            });
        let mut session = match opened {
            Ok(session) => session,
            Err(err) => {
                engine_warn!("Could not open render session: {}", err);
                for (index, url) in accepted.iter().enumerate() {
                    let outcome = SourceOutcome::failure(
                        SourceFailureKind::Render,
                        format!("render session unavailable: {err}"),
                    );
                    self.finish(&mut batch, index, url, outcome, sink);
                }
                return batch;
            }
        };

        for (index, url) in accepted.iter().enumerate() {
            if index > 0 && !self.settings.delay_between.is_zero() {
                tokio::time::sleep(self.settings.delay_between).await;
            }
            sink.emit(EngineEvent::SourceStarted {
                index,
                url: url.to_string(),
            });

            let outcome = AssertUnwindSafe(self.scrape_one(session.as_mut(), index, url, sink))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| {
                    SourceOutcome::failure(
                        SourceFailureKind::Render,
                        format!("unexpected fault: {}", panic_message(panic.as_ref())),
                    )
                });
            self.finish(&mut batch, index, url, outcome, sink);
        }

        match AssertUnwindSafe(session.close()).catch_unwind().await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => engine_warn!("Render session did not close cleanly: {}", err),
            Err(panic) => engine_warn!(
                "Render session panicked while closing: {}",
                panic_message(panic.as_ref())
            ),
        }
        engine_info!(
            "Batch finished: {} succeeded, {} failed",
            batch.success_count(),
            batch.failure_count()
        );
        batch
    }

    async fn scrape_one(
        &self,
        session: &mut dyn RenderSession,
        index: usize,
        url: &str,
        sink: &dyn ProgressSink,
    ) -> SourceOutcome {
        sink.emit(EngineEvent::Progress(SourceProgress {
            index,
            stage: Stage::Rendering,
        }));
        let html = match session.render(url).await {
            Ok(html) => html,
            Err(err) => {
                return SourceOutcome::failure(
                    SourceFailureKind::Render,
                    format!("error fetching {url}: {err}"),
                )
            }
        };

        sink.emit(EngineEvent::Progress(SourceProgress {
            index,
            stage: Stage::Extracting,
        }));
        self.extractor.extract(&html)
    }

    fn finish(
        &self,
        batch: &mut ScrapeBatchResult,
        index: usize,
        url: &str,
        outcome: SourceOutcome,
        sink: &dyn ProgressSink,
    ) {
        sink.emit(EngineEvent::Progress(SourceProgress {
            index,
            stage: Stage::Done,
        }));
        sink.emit(EngineEvent::SourceCompleted {
            index,
            url: url.to_string(),
            failure: outcome.failure_kind(),
        });
        batch.record(SourceResult::new(url, outcome));
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "panic".to_string()
    }
}
