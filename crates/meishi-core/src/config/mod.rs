//! Configuration system for meishi.

use serde::{Deserialize, Serialize};

use crate::cluster::ClusterConfig;
use crate::error::{MeishiError, MeishiResult};
use crate::extract::{ExtractionConfig, Vocabulary};
use crate::traits::OcrConfig;

/// Main pipeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MeishiConfig {
    /// OCR backend configuration.
    pub ocr: OcrConfig,
    /// Card segmentation settings.
    pub clustering: ClusterConfig,
    /// Field extraction windows and bounds.
    pub extraction: ExtractionConfig,
    /// Keyword and label tables.
    pub vocabulary: Vocabulary,
}

impl MeishiConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> MeishiResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| MeishiError::Configuration(e.to_string()))
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| MeishiError::Configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| MeishiError::Configuration(e.to_string())),
            _ => Err(MeishiError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay environment variables on an existing configuration.
    pub fn apply_env(&mut self) {
        // OCR credentials
        if let Ok(api_key) =
            std::env::var("MEISHI_OCR_API_KEY").or_else(|_| std::env::var("GOOGLE_API_KEY"))
        {
            self.ocr.api_key = Some(api_key);
        }
        if let Ok(token) = std::env::var("MEISHI_OCR_ACCESS_TOKEN") {
            self.ocr.access_token = Some(token);
        }
        if let Ok(endpoint) = std::env::var("MEISHI_OCR_ENDPOINT") {
            self.ocr.endpoint = Some(endpoint);
        }
        if let Ok(hints) = std::env::var("MEISHI_LANGUAGE_HINTS") {
            let hints: Vec<String> = hints
                .split(',')
                .map(|h| h.trim().to_string())
                .filter(|h| !h.is_empty())
                .collect();
            if !hints.is_empty() {
                self.ocr.language_hints = hints;
            }
        }

        // Output cap
        if let Some(max) = std::env::var("MEISHI_MAX_CARDS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
        {
            self.clustering.max_clusters = max;
        }
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> MeishiConfigBuilder {
        MeishiConfigBuilder::default()
    }
}

/// Builder for MeishiConfig.
#[derive(Default)]
pub struct MeishiConfigBuilder {
    config: MeishiConfig,
}

impl MeishiConfigBuilder {
    /// Set OCR configuration.
    pub fn ocr(mut self, config: OcrConfig) -> Self {
        self.config.ocr = config;
        self
    }

    /// Set clustering configuration.
    pub fn clustering(mut self, config: ClusterConfig) -> Self {
        self.config.clustering = config;
        self
    }

    /// Set extraction configuration.
    pub fn extraction(mut self, config: ExtractionConfig) -> Self {
        self.config.extraction = config;
        self
    }

    /// Set vocabulary tables.
    pub fn vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.config.vocabulary = vocabulary;
        self
    }

    /// Set the maximum number of cards per photo.
    pub fn max_cards(mut self, max: usize) -> Self {
        self.config.clustering.max_clusters = max;
        self
    }

    /// Set OCR language hints.
    pub fn language_hints(mut self, hints: Vec<String>) -> Self {
        self.config.ocr.language_hints = hints;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> MeishiConfig {
        self.config
    }
}
