use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use jobcloud_core::{SourceFailureKind, SourceOutcome};
use jobcloud_engine::{
    BatchScraper, EngineEvent, NullProgressSink, ProgressSink, RenderError, RenderFailureKind,
    RenderSession, Renderer, SourceProgress, Stage,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

#[derive(Clone)]
enum Scripted {
    Html(String),
    Fail,
    Panic,
}

#[derive(Default)]
struct Counters {
    opened: AtomicUsize,
    closed: AtomicUsize,
    rendered: Mutex<Vec<String>>,
}

struct ScriptedRenderer {
    pages: HashMap<String, Scripted>,
    counters: Arc<Counters>,
    fail_open: bool,
    panic_on_open: bool,
    panic_on_close: bool,
}

impl ScriptedRenderer {
    fn new(pages: &[(&str, Scripted)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, page)| (url.to_string(), page.clone()))
                .collect(),
            counters: Arc::new(Counters::default()),
            fail_open: false,
            panic_on_open: false,
            panic_on_close: false,
        }
    }
}

struct ScriptedSession {
    pages: HashMap<String, Scripted>,
    counters: Arc<Counters>,
    panic_on_close: bool,
}

#[async_trait::async_trait]
impl Renderer for ScriptedRenderer {
    async fn open(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        if self.panic_on_open {
            panic!("browser binary crashed during launch");
        }
        if self.fail_open {
            return Err(RenderError {
                kind: RenderFailureKind::Launch,
                message: "chrome not found".into(),
            });
        }
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedSession {
            pages: self.pages.clone(),
            counters: self.counters.clone(),
            panic_on_close: self.panic_on_close,
        }))
    }
}

#[async_trait::async_trait]
impl RenderSession for ScriptedSession {
    async fn render(&mut self, url: &str) -> Result<String, RenderError> {
        self.counters.rendered.lock().unwrap().push(url.to_string());
        match self.pages.get(url) {
            Some(Scripted::Html(html)) => Ok(html.clone()),
            Some(Scripted::Panic) => panic!("driver crashed on {url}"),
            Some(Scripted::Fail) | None => Err(RenderError {
                kind: RenderFailureKind::Navigation,
                message: "net::ERR_CONNECTION_RESET".into(),
            }),
        }
    }

    async fn close(self: Box<Self>) -> Result<(), RenderError> {
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
        if self.panic_on_close {
            panic!("browser process vanished before shutdown");
        }
        Ok(())
    }
}

#[derive(Default)]
struct TestSink {
    events: Mutex<Vec<EngineEvent>>,
}

impl TestSink {
    fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn posting(title: &str) -> String {
    format!(
        "<html><body><main><h1>{title}</h1><p>You will design, build and operate \
         distributed systems that process billions of events per day across regions.</p>\
         </main></body></html>"
    )
}

fn urls(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|u| u.to_string()).collect()
}

#[tokio::test]
async fn failing_url_does_not_stop_the_batch() {
    init_logging();
    let renderer = ScriptedRenderer::new(&[
        ("https://a.example/1", Scripted::Html(posting("Data Engineer"))),
        ("https://b.example/2", Scripted::Fail),
        ("https://c.example/3", Scripted::Html(posting("Site Reliability Engineer"))),
    ]);
    let counters = renderer.counters.clone();
    let scraper = BatchScraper::new(renderer);

    let batch = scraper
        .scrape_all(
            &urls(&["https://a.example/1", "https://b.example/2", "https://c.example/3"]),
            &NullProgressSink,
        )
        .await;

    assert_eq!(batch.len(), 3);
    let kinds: Vec<_> = batch.iter().map(|r| r.outcome.failure_kind()).collect();
    assert_eq!(kinds, vec![None, Some(SourceFailureKind::Render), None]);
    match &batch.get("https://b.example/2").unwrap().outcome {
        SourceOutcome::Failure { detail, .. } => {
            assert!(detail.contains("ERR_CONNECTION_RESET"), "{detail}");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(counters.opened.load(Ordering::SeqCst), 1);
    assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn panicking_render_is_recorded_and_session_released() {
    init_logging();
    let renderer = ScriptedRenderer::new(&[
        ("https://a.example/1", Scripted::Html(posting("Data Engineer"))),
        ("https://b.example/2", Scripted::Panic),
        ("https://c.example/3", Scripted::Html(posting("Platform Engineer"))),
    ]);
    let counters = renderer.counters.clone();
    let scraper = BatchScraper::new(renderer);

    let batch = scraper
        .scrape_all(
            &urls(&["https://a.example/1", "https://b.example/2", "https://c.example/3"]),
            &NullProgressSink,
        )
        .await;

    assert_eq!(batch.len(), 3);
    match &batch.get("https://b.example/2").unwrap().outcome {
        SourceOutcome::Failure { kind, detail } => {
            assert_eq!(*kind, SourceFailureKind::Render);
            assert!(detail.contains("driver crashed"), "{detail}");
        }
        other => panic!("unexpected {other:?}"),
    }
    assert!(batch.get("https://c.example/3").unwrap().outcome.is_text());
    assert_eq!(
        *counters.rendered.lock().unwrap(),
        urls(&["https://a.example/1", "https://b.example/2", "https://c.example/3"])
    );
    assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unprefixed_inputs_never_reach_the_renderer() {
    init_logging();
    let renderer = ScriptedRenderer::new(&[(
        "http://good.example/job",
        Scripted::Html(posting("Backend Engineer")),
    )]);
    let counters = renderer.counters.clone();
    let scraper = BatchScraper::new(renderer);

    let batch = scraper
        .scrape_all(
            &urls(&["not-a-url", "http://good.example/job", "good.example/job"]),
            &NullProgressSink,
        )
        .await;

    assert_eq!(batch.len(), 1);
    assert_eq!(batch.iter().next().unwrap().host, "good.example");
    assert_eq!(
        *counters.rendered.lock().unwrap(),
        urls(&["http://good.example/job"])
    );
}

#[tokio::test]
async fn nothing_to_scrape_opens_no_session() {
    init_logging();
    let renderer = ScriptedRenderer::new(&[]);
    let counters = renderer.counters.clone();
    let scraper = BatchScraper::new(renderer);

    let batch = scraper
        .scrape_all(&urls(&["ftp://x", "mailto:jobs@example.com"]), &NullProgressSink)
        .await;

    assert!(batch.is_empty());
    assert_eq!(counters.opened.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn session_open_failure_marks_every_url() {
    init_logging();
    let mut renderer = ScriptedRenderer::new(&[]);
    renderer.fail_open = true;
    let scraper = BatchScraper::new(renderer);

    let batch = scraper
        .scrape_all(
            &urls(&["https://a.example/1", "https://b.example/2"]),
            &NullProgressSink,
        )
        .await;

    assert_eq!(batch.len(), 2);
    for result in &batch {
        match &result.outcome {
            SourceOutcome::Failure { kind, detail } => {
                assert_eq!(*kind, SourceFailureKind::Render);
                assert!(detail.contains("chrome not found"), "{detail}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

#[tokio::test]
async fn panicking_launch_marks_every_url() {
    init_logging();
    let mut renderer = ScriptedRenderer::new(&[]);
    renderer.panic_on_open = true;
    let scraper = BatchScraper::new(renderer);

    let batch = scraper
        .scrape_all(
            &urls(&["https://a.example/1", "https://b.example/2"]),
            &NullProgressSink,
        )
        .await;

    assert_eq!(batch.len(), 2);
    for result in &batch {
        match &result.outcome {
            SourceOutcome::Failure { kind, detail } => {
                assert_eq!(*kind, SourceFailureKind::Render);
                assert!(detail.contains("crashed during launch"), "{detail}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}

#[tokio::test]
async fn panicking_close_keeps_the_batch() {
    init_logging();
    let mut renderer = ScriptedRenderer::new(&[(
        "https://a.example/1",
        Scripted::Html(posting("Data Engineer")),
    )]);
    renderer.panic_on_close = true;
    let counters = renderer.counters.clone();
    let scraper = BatchScraper::new(renderer);

    let batch = scraper
        .scrape_all(&urls(&["https://a.example/1"]), &NullProgressSink)
        .await;

    assert_eq!(batch.len(), 1);
    assert!(batch.get("https://a.example/1").unwrap().outcome.is_text());
    assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn extraction_outcomes_flow_into_the_batch() {
    init_logging();
    let renderer = ScriptedRenderer::new(&[
        (
            "https://a.example/expired",
            Scripted::Html(
                "<html><body><p>This job posting has expired.</p></body></html>".into(),
            ),
        ),
        (
            "https://b.example/blank",
            Scripted::Html("<html><body><p>Loading...</p></body></html>".into()),
        ),
    ]);
    let scraper = BatchScraper::new(renderer);

    let batch = scraper
        .scrape_all(
            &urls(&["https://a.example/expired", "https://b.example/blank"]),
            &NullProgressSink,
        )
        .await;

    let kinds: Vec<_> = batch.iter().map(|r| r.outcome.failure_kind()).collect();
    assert_eq!(
        kinds,
        vec![
            Some(SourceFailureKind::NotFound),
            Some(SourceFailureKind::EmptyContent)
        ]
    );
}

#[tokio::test]
async fn progress_events_follow_each_source() {
    init_logging();
    let renderer = ScriptedRenderer::new(&[
        ("https://a.example/1", Scripted::Html(posting("Data Engineer"))),
        ("https://b.example/2", Scripted::Fail),
    ]);
    let scraper = BatchScraper::new(renderer);
    let sink = TestSink::default();

    scraper
        .scrape_all(&urls(&["https://a.example/1", "https://b.example/2"]), &sink)
        .await;

    let events = sink.take();
    let second: Vec<_> = events
        .iter()
        .filter(|event| match event {
            EngineEvent::SourceStarted { index, .. }
            | EngineEvent::SourceCompleted { index, .. } => *index == 1,
            EngineEvent::Progress(SourceProgress { index, .. }) => *index == 1,
        })
        .cloned()
        .collect();
    assert_eq!(
        second,
        vec![
            EngineEvent::Progress(SourceProgress {
                index: 1,
                stage: Stage::Queued
            }),
            EngineEvent::SourceStarted {
                index: 1,
                url: "https://b.example/2".into()
            },
            EngineEvent::Progress(SourceProgress {
                index: 1,
                stage: Stage::Rendering
            }),
            EngineEvent::Progress(SourceProgress {
                index: 1,
                stage: Stage::Done
            }),
            EngineEvent::SourceCompleted {
                index: 1,
                url: "https://b.example/2".into(),
                failure: Some(SourceFailureKind::Render),
            },
        ]
    );
}
