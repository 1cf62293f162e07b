//! Server state management.

use std::sync::Arc;
use std::time::Duration;

use meishi_core::pipeline::CardPipeline;
use meishi_core::traits::CardStore;

/// Default upload limit for photos.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default deadline for one scan, OCR included.
pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_secs(30);

/// Request-handling settings.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Deadline for one scan; `None` waits indefinitely.
    pub scan_timeout: Option<Duration>,
    /// Largest accepted request body.
    pub max_upload_bytes: usize,
    /// Bearer token required by the auth middleware; `None` accepts any request.
    pub api_key: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            scan_timeout: Some(DEFAULT_SCAN_TIMEOUT),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            api_key: None,
        }
    }
}

impl ServerSettings {
    /// Load settings from environment variables.
    ///
    /// `MEISHI_SCAN_TIMEOUT_SECS=0` disables the scan deadline.
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Some(secs) = std::env::var("MEISHI_SCAN_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            settings.scan_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(bytes) = std::env::var("MEISHI_MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
        {
            settings.max_upload_bytes = bytes;
        }
        settings.api_key = std::env::var("MEISHI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());

        settings
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<CardPipeline>,
    pub store: Arc<dyn CardStore>,
    pub settings: Arc<ServerSettings>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(pipeline: CardPipeline, store: Arc<dyn CardStore>, settings: ServerSettings) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            store,
            settings: Arc::new(settings),
        }
    }
}
