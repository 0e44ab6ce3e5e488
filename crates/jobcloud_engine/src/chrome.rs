use std::fmt;
use std::time::Instant;

use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::{Browser, BrowserConfig, Page};
use engine_logging::{engine_debug, engine_info, engine_warn};
use futures_util::{Stream, StreamExt};
use tokio::task::JoinHandle;

use crate::render::{RenderSession, RenderSettings, Renderer};
use crate::{RenderError, RenderFailureKind};

const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";
const SCROLL_TO_TOP: &str = "window.scrollTo(0, 0);";

/// Renders pages in a headless Chrome driven over the DevTools protocol.
#[derive(Debug, Clone, Default)]
pub struct ChromeRenderer {
    settings: RenderSettings,
}

impl ChromeRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    fn browser_config(&self) -> Result<BrowserConfig, RenderError> {
        let (width, height) = self.settings.viewport;
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(width, height)
            .viewport(Viewport {
                width,
                height,
                ..Viewport::default()
            })
            .request_timeout(self.settings.navigation_timeout)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg(format!("--user-agent={}", self.settings.user_agent));

        if !self.settings.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &self.settings.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        for arg in &self.settings.extra_args {
            builder = builder.arg(arg.as_str());
        }

        builder
            .build()
            .map_err(|err| RenderError::new(RenderFailureKind::Launch, err))
    }
}

#[async_trait::async_trait]
impl Renderer for ChromeRenderer {
    async fn open(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        let config = self.browser_config()?;
        let (browser, handler) = Browser::launch(config)
            .await
            .map_err(|err| RenderError::new(RenderFailureKind::Launch, err.to_string()))?;

        let handler_task = tokio::spawn(async move {
            let events = drive_handler(handler).await;
            engine_debug!("Browser handler stream ended after {} events", events);
        });

        engine_info!(
            "Browser launched (viewport {}x{}, headless={})",
            self.settings.viewport.0,
            self.settings.viewport.1,
            self.settings.headless
        );
        Ok(Box::new(ChromeSession {
            browser,
            handler_task,
            settings: self.settings.clone(),
        }))
    }
}

/// One browser process. Dropping it without `close` still kills the child
/// process, but `close` also reaps it and stops the handler task.
pub struct ChromeSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    settings: RenderSettings,
}

impl ChromeSession {
    async fn load(&self, page: &Page, url: &str) -> Result<String, RenderError> {
        match tokio::time::timeout(self.settings.navigation_timeout, page.goto(url)).await {
            Err(_) => {
                return Err(RenderError::new(
                    RenderFailureKind::Timeout,
                    format!("navigation exceeded {:?}", self.settings.navigation_timeout),
                ))
            }
            Ok(Err(err)) => {
                return Err(RenderError::new(
                    RenderFailureKind::Navigation,
                    err.to_string(),
                ))
            }
            Ok(Ok(_)) => {}
        }

        tokio::time::sleep(self.settings.initial_delay).await;
        run_script(page, url, SCROLL_TO_BOTTOM).await;
        tokio::time::sleep(self.settings.scroll_delay).await;
        run_script(page, url, SCROLL_TO_TOP).await;
        tokio::time::sleep(self.settings.settle_delay).await;

        page.content()
            .await
            .map_err(|err| RenderError::new(RenderFailureKind::Protocol, err.to_string()))
    }
}

/// Poll the DevTools handler until its stream ends, returning how many
/// events it yielded. The browser only makes progress while this runs, and a
/// single undecodable CDP message must not stop it.
async fn drive_handler<S, E>(mut handler: S) -> usize
where
    S: Stream<Item = Result<(), E>> + Unpin,
    E: fmt::Display,
{
    let mut events = 0;
    while let Some(event) = handler.next().await {
        events += 1;
        if let Err(err) = event {
            engine_debug!("Browser handler error (continuing): {}", err);
        }
    }
    events
}

/// Script failures are tolerated: whatever HTML exists is still used.
async fn run_script(page: &Page, url: &str, script: &str) {
    if let Err(err) = page.evaluate(script).await {
        engine_warn!("Script failed on {}: {} (continuing with current DOM)", url, err);
    }
}

#[async_trait::async_trait]
impl RenderSession for ChromeSession {
    async fn render(&mut self, url: &str) -> Result<String, RenderError> {
        let started = Instant::now();
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|err| RenderError::new(RenderFailureKind::Protocol, err.to_string()))?;

        let outcome = self.load(&page, url).await;
        if let Err(err) = page.close().await {
            engine_warn!("Failed to close tab for {}: {}", url, err);
        }

        engine_debug!(
            "Rendered {} in {:?} ({})",
            url,
            started.elapsed(),
            if outcome.is_ok() { "ok" } else { "failed" }
        );
        outcome
    }

    async fn close(self: Box<Self>) -> Result<(), RenderError> {
        let ChromeSession {
            mut browser,
            handler_task,
            ..
        } = *self;

        let closed = browser
            .close()
            .await
            .map(|_| ())
            .map_err(|err| RenderError::new(RenderFailureKind::Protocol, err.to_string()));
        if let Err(err) = browser.wait().await {
            engine_warn!("Failed to reap browser process: {}", err);
        }
        handler_task.abort();
        engine_info!("Browser closed");
        closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_budget_is_eight_seconds() {
        let renderer = ChromeRenderer::default();
        assert_eq!(renderer.settings().settle_budget().as_secs(), 8);
        assert_eq!(renderer.settings().viewport, (1920, 1080));
    }

    #[tokio::test]
    async fn handler_keeps_polling_past_errors() {
        let events = futures_util::stream::iter(vec![
            Ok(()),
            Err("unknown CDP message"),
            Ok(()),
            Ok(()),
        ]);
        assert_eq!(drive_handler(events).await, 4);
    }
}
