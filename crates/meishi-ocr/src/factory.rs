//! Factory for creating OCR backends.

use std::sync::Arc;

use meishi_core::error::{MeishiError, MeishiResult};
use meishi_core::traits::{OcrBackend, OcrConfig, OcrProvider};

/// Factory for creating OCR backends.
pub struct OcrFactory;

impl OcrFactory {
    /// Create an OCR backend from the given configuration.
    pub fn create(config: OcrConfig) -> MeishiResult<Arc<dyn OcrBackend>> {
        let provider = config.provider;
        match provider {
            #[cfg(feature = "google")]
            OcrProvider::GoogleVision => {
                let backend = crate::google::GoogleVisionOcr::new(config)?;
                Ok(Arc::new(backend))
            }

            #[allow(unreachable_patterns)]
            provider => Err(MeishiError::UnsupportedProvider {
                provider: provider.to_string(),
            }),
        }
    }

    /// Create a Google Vision backend authenticated by API key.
    #[cfg(feature = "google")]
    pub fn google_vision(api_key: &str) -> MeishiResult<Arc<dyn OcrBackend>> {
        let config = OcrConfig {
            api_key: Some(api_key.to_string()),
            ..Default::default()
        };
        Self::create(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_google_vision() {
        let backend = OcrFactory::google_vision("test-key").unwrap();
        assert_eq!(backend.name(), "google_vision");
    }
}
