use std::fmt;

use jobcloud_core::SourceFailureKind;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Queued,
    Rendering,
    Extracting,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceProgress {
    /// Position among the accepted URLs of the batch.
    pub index: usize,
    pub stage: Stage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    SourceStarted {
        index: usize,
        url: String,
    },
    Progress(SourceProgress),
    SourceCompleted {
        index: usize,
        url: String,
        failure: Option<SourceFailureKind>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct RenderError {
    pub kind: RenderFailureKind,
    pub message: String,
}

impl RenderError {
    pub(crate) fn new(kind: RenderFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderFailureKind {
    /// The browser could not be started or configured.
    Launch,
    InvalidUrl,
    Navigation,
    /// A browser protocol call failed after navigation.
    Protocol,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Network,
}

impl fmt::Display for RenderFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderFailureKind::Launch => write!(f, "browser launch failed"),
            RenderFailureKind::InvalidUrl => write!(f, "invalid url"),
            RenderFailureKind::Navigation => write!(f, "navigation failed"),
            RenderFailureKind::Protocol => write!(f, "browser protocol error"),
            RenderFailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            RenderFailureKind::Timeout => write!(f, "timeout"),
            RenderFailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            RenderFailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            RenderFailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            RenderFailureKind::Network => write!(f, "network error"),
        }
    }
}
