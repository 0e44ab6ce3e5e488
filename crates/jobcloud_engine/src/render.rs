use std::path::PathBuf;
use std::time::Duration;

use crate::RenderError;

pub const DESKTOP_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Browser rendering budget and identity.
///
/// The three delays form a best-effort settle budget per page; they are
/// plain waits, not deadlines.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub user_agent: String,
    pub viewport: (u32, u32),
    /// Wait after the load event before scrolling.
    pub initial_delay: Duration,
    /// Wait after scrolling to the bottom.
    pub scroll_delay: Duration,
    /// Wait after scrolling back to the top.
    pub settle_delay: Duration,
    pub navigation_timeout: Duration,
    pub headless: bool,
    pub chrome_executable: Option<PathBuf>,
    pub extra_args: Vec<String>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            user_agent: DESKTOP_USER_AGENT.to_string(),
            viewport: (1920, 1080),
            initial_delay: Duration::from_secs(5),
            scroll_delay: Duration::from_secs(2),
            settle_delay: Duration::from_secs(1),
            navigation_timeout: Duration::from_secs(30),
            headless: true,
            chrome_executable: None,
            extra_args: Vec::new(),
        }
    }
}

impl RenderSettings {
    pub fn settle_budget(&self) -> Duration {
        self.initial_delay + self.scroll_delay + self.settle_delay
    }
}

/// Opens rendering sessions. One session serves a whole batch.
#[async_trait::async_trait]
pub trait Renderer: Send + Sync {
    async fn open(&self) -> Result<Box<dyn RenderSession>, RenderError>;
}

/// A live rendering session (for Chrome: one browser process).
///
/// Callers must hand the session back through `close` on every path.
#[async_trait::async_trait]
pub trait RenderSession: Send {
    /// Load `url`, let its scripts run, and return the resulting HTML.
    async fn render(&mut self, url: &str) -> Result<String, RenderError>;

    async fn close(self: Box<Self>) -> Result<(), RenderError>;
}
