//! Factory for creating the scan pipeline from configuration.

use std::path::{Path, PathBuf};

use meishi_core::config::MeishiConfig;
use meishi_core::error::MeishiResult;
use meishi_core::pipeline::CardPipeline;
use meishi_ocr::OcrFactory;
use tracing::info;

/// `~/.config/meishi/config.toml` on Linux, the platform equivalent elsewhere.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("meishi").join("config.toml"))
}

/// Load configuration, then overlay the environment.
///
/// An explicit `path` must exist; otherwise the default config file is used
/// when present and built-in defaults when not.
pub fn load_config(path: Option<&Path>) -> MeishiResult<MeishiConfig> {
    let file = match path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|p| p.is_file()),
    };

    let mut config = match file {
        Some(file) => {
            info!(path = %file.display(), "Loading configuration file");
            MeishiConfig::from_file(&file)?
        }
        None => MeishiConfig::default(),
    };
    config.apply_env();
    Ok(config)
}

/// Create a pipeline backed by the configured OCR provider.
pub fn create_pipeline(config: &MeishiConfig) -> MeishiResult<CardPipeline> {
    let backend = OcrFactory::create(config.ocr.clone())?;
    info!(backend = backend.name(), "OCR backend ready");
    CardPipeline::new(backend, config)
}
