//! OCR backend trait and related types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::MeishiResult;
use crate::types::TextBlock;

/// Core OCR trait - all text-detection backends implement this.
#[async_trait]
pub trait OcrBackend: Send + Sync {
    /// Detect text in an image and return one block per detected region.
    ///
    /// An image without readable text yields `Ok(vec![])`; backend-reported
    /// failures are errors and are not retried.
    async fn detect_text(
        &self,
        image: &[u8],
        language_hints: &[String],
    ) -> MeishiResult<Vec<TextBlock>>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

/// OCR backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Provider type.
    #[serde(default)]
    pub provider: OcrProvider,
    /// API key (falls back to `GOOGLE_API_KEY` when unset).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// OAuth access token, used instead of an API key when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Override for the API base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Language hints sent with every request.
    #[serde(default = "default_language_hints")]
    pub language_hints: Vec<String>,
    /// Detection feature to request.
    #[serde(default)]
    pub feature: DetectionFeature,
}

fn default_language_hints() -> Vec<String> {
    vec!["ja".to_string(), "en".to_string()]
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            provider: OcrProvider::default(),
            api_key: None,
            access_token: None,
            endpoint: None,
            language_hints: default_language_hints(),
            feature: DetectionFeature::default(),
        }
    }
}

/// OCR provider type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OcrProvider {
    #[default]
    GoogleVision,
}

/// Google Vision detection feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetectionFeature {
    /// Dense-text model with the page/block/paragraph hierarchy.
    #[default]
    DocumentTextDetection,
    /// Sparse-text model; only a flat annotation list is guaranteed.
    TextDetection,
}

impl DetectionFeature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DocumentTextDetection => "DOCUMENT_TEXT_DETECTION",
            Self::TextDetection => "TEXT_DETECTION",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ocr_config_default() {
        let config = OcrConfig::default();
        assert_eq!(config.provider, OcrProvider::GoogleVision);
        assert_eq!(config.language_hints, vec!["ja", "en"]);
        assert_eq!(config.feature.as_str(), "DOCUMENT_TEXT_DETECTION");
    }

    #[test]
    fn test_provider_from_str() {
        let provider: OcrProvider = "google_vision".parse().unwrap();
        assert_eq!(provider, OcrProvider::GoogleVision);
        assert!("tesseract".parse::<OcrProvider>().is_err());
    }

    #[test]
    fn test_ocr_config_deserialize_defaults() {
        let config: OcrConfig = serde_json::from_str(r#"{"api_key": "k"}"#).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.language_hints.len(), 2);
    }
}
