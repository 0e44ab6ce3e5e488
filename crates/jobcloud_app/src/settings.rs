//! Optional RON settings file for renderer timing and identity.
//!
//! Every field may be omitted; omitted fields keep the built-in defaults.
//!
//! ```ron
//! (
//!     user_agent: Some("Mozilla/5.0 (X11; Linux x86_64)"),
//!     initial_delay_ms: Some(3000),
//!     delay_between_ms: Some(500),
//! )
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use engine_logging::engine_info;
use jobcloud_engine::{BatchSettings, FetchSettings, RenderSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    pub user_agent: Option<String>,
    pub viewport: Option<(u32, u32)>,
    pub initial_delay_ms: Option<u64>,
    pub scroll_delay_ms: Option<u64>,
    pub settle_delay_ms: Option<u64>,
    pub navigation_timeout_secs: Option<u64>,
    pub headless: Option<bool>,
    pub chrome_executable: Option<PathBuf>,
    pub extra_args: Vec<String>,
    pub request_timeout_secs: Option<u64>,
    pub max_bytes: Option<u64>,
    pub delay_between_ms: Option<u64>,
}

impl SettingsFile {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = ron::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        engine_info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    pub fn render_settings(&self) -> RenderSettings {
        let mut settings = RenderSettings::default();
        if let Some(agent) = &self.user_agent {
            settings.user_agent = agent.clone();
        }
        if let Some(viewport) = self.viewport {
            settings.viewport = viewport;
        }
        if let Some(ms) = self.initial_delay_ms {
            settings.initial_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = self.scroll_delay_ms {
            settings.scroll_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = self.settle_delay_ms {
            settings.settle_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = self.navigation_timeout_secs {
            settings.navigation_timeout = Duration::from_secs(secs);
        }
        if let Some(headless) = self.headless {
            settings.headless = headless;
        }
        settings.chrome_executable = self.chrome_executable.clone();
        settings.extra_args = self.extra_args.clone();
        settings
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        let mut settings = FetchSettings::default();
        if let Some(agent) = &self.user_agent {
            settings.user_agent = agent.clone();
        }
        if let Some(secs) = self.request_timeout_secs {
            settings.request_timeout = Duration::from_secs(secs);
        }
        if let Some(max) = self.max_bytes {
            settings.max_bytes = max;
        }
        settings
    }

    pub fn batch_settings(&self) -> BatchSettings {
        BatchSettings {
            delay_between: Duration::from_millis(self.delay_between_ms.unwrap_or(0)),
        }
    }
}
