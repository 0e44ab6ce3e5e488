use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use engine_logging::engine_debug;
use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};

use crate::decode::decode_body;
use crate::render::{RenderSession, Renderer, DESKTOP_USER_AGENT};
use crate::{RenderError, RenderFailureKind};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            user_agent: DESKTOP_USER_AGENT.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
        }
    }
}

/// Plain HTTP renderer: returns the served HTML without running scripts.
///
/// Useful for server-rendered career sites and where no Chrome is installed.
#[derive(Debug, Clone, Default)]
pub struct StaticRenderer {
    settings: FetchSettings,
}

impl StaticRenderer {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl Renderer for StaticRenderer {
    async fn open(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        let redirects = Arc::new(AtomicUsize::new(0));
        let client = build_client(&self.settings, redirects.clone())?;
        Ok(Box::new(StaticSession {
            client,
            redirects,
            settings: self.settings.clone(),
        }))
    }
}

fn build_client(
    settings: &FetchSettings,
    redirect_counter: Arc<AtomicUsize>,
) -> Result<reqwest::Client, RenderError> {
    let redirect_limit = settings.redirect_limit;
    let policy = reqwest::redirect::Policy::custom(move |attempt| {
        let count = attempt.previous().len();
        redirect_counter.store(count, Ordering::Relaxed);
        if count >= redirect_limit {
            attempt.error("redirect limit exceeded")
        } else {
            attempt.follow()
        }
    });

    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

    reqwest::Client::builder()
        .user_agent(settings.user_agent.as_str())
        .default_headers(headers)
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.request_timeout)
        .redirect(policy)
        .build()
        .map_err(|err| RenderError::new(RenderFailureKind::Launch, err.to_string()))
}

pub struct StaticSession {
    client: reqwest::Client,
    redirects: Arc<AtomicUsize>,
    settings: FetchSettings,
}

impl StaticSession {
    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ct))
    }

    fn too_large(&self, actual: u64) -> RenderError {
        RenderError::new(
            RenderFailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl RenderSession for StaticSession {
    async fn render(&mut self, url: &str) -> Result<String, RenderError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| RenderError::new(RenderFailureKind::InvalidUrl, err.to_string()))?;
        self.redirects.store(0, Ordering::Relaxed);

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::new(
                RenderFailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(content_len));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        if let Some(ct) = content_type.as_deref() {
            if !self.is_content_type_allowed(ct) {
                return Err(RenderError::new(
                    RenderFailureKind::UnsupportedContentType {
                        content_type: ct.to_string(),
                    },
                    "unsupported content type",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(next_len));
            }
            bytes.extend_from_slice(&chunk);
        }

        engine_debug!(
            "Fetched {} ({} bytes, {} redirects)",
            url,
            bytes.len(),
            self.redirects.load(Ordering::Relaxed)
        );
        Ok(decode_body(&bytes, content_type.as_deref()))
    }

    async fn close(self: Box<Self>) -> Result<(), RenderError> {
        Ok(())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> RenderError {
    if err.is_timeout() {
        return RenderError::new(RenderFailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return RenderError::new(RenderFailureKind::RedirectLimitExceeded, err.to_string());
    }
    RenderError::new(RenderFailureKind::Network, err.to_string())
}
