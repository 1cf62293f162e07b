//! Google Cloud Vision OCR backend.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use tracing::{debug, warn};

use meishi_core::error::{MeishiError, MeishiResult};
use meishi_core::traits::{DetectionFeature, OcrBackend, OcrConfig};
use meishi_core::types::TextBlock;

use crate::annotation::{
    AnnotateImageRequest, AnnotateRequest, AnnotateResponse, ErrorEnvelope, Feature, ImageContent,
    ImageContext,
};

const DEFAULT_ENDPOINT: &str = "https://vision.googleapis.com";

#[derive(Clone)]
enum Credential {
    ApiKey(String),
    AccessToken(String),
}

/// Google Cloud Vision `images:annotate` backend.
pub struct GoogleVisionOcr {
    client: Client,
    credential: Credential,
    endpoint: String,
    feature: DetectionFeature,
}

impl GoogleVisionOcr {
    /// Create a new Vision backend.
    ///
    /// An access token takes precedence over an API key; the key falls back to
    /// the `GOOGLE_API_KEY` environment variable.
    pub fn new(config: OcrConfig) -> MeishiResult<Self> {
        let credential = match config.access_token {
            Some(token) => Credential::AccessToken(token),
            None => config
                .api_key
                .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
                .map(Credential::ApiKey)
                .ok_or_else(|| {
                    MeishiError::Configuration(
                        "Google Vision credentials required. Set GOOGLE_API_KEY or provide api_key or access_token."
                            .to_string(),
                    )
                })?,
        };

        let endpoint = config
            .endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();
        url::Url::parse(&endpoint).map_err(|e| {
            MeishiError::Configuration(format!("Invalid OCR endpoint '{}': {}", endpoint, e))
        })?;

        Ok(Self {
            client: Client::new(),
            credential,
            endpoint,
            feature: config.feature,
        })
    }

    fn annotate_url(&self) -> String {
        format!("{}/v1/images:annotate", self.endpoint)
    }

    fn build_request(&self, image: &[u8], language_hints: &[String]) -> AnnotateRequest {
        AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: STANDARD.encode(image),
                },
                features: vec![Feature {
                    feature_type: self.feature.as_str(),
                }],
                image_context: (!language_hints.is_empty()).then(|| ImageContext {
                    language_hints: language_hints.to_vec(),
                }),
            }],
        }
    }
}

#[async_trait]
impl OcrBackend for GoogleVisionOcr {
    async fn detect_text(
        &self,
        image: &[u8],
        language_hints: &[String],
    ) -> MeishiResult<Vec<TextBlock>> {
        let request = self.build_request(image, language_hints);

        let builder = self.client.post(self.annotate_url()).json(&request);
        let builder = match &self.credential {
            Credential::ApiKey(key) => builder.query(&[("key", key)]),
            Credential::AccessToken(token) => builder.bearer_auth(token),
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                MeishiError::timeout(format!("Vision API request timed out: {}", e))
            } else {
                MeishiError::network(format!("Failed to call Vision API: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!(status = status.as_u16(), %message, "Vision API returned an error status");
            return Err(MeishiError::from_http_status(status.as_u16(), &message));
        }

        let result: AnnotateResponse = response.json().await.map_err(|e| {
            MeishiError::ocr_invalid_response(format!("Failed to parse Vision response: {}", e))
        })?;

        let Some(annotation) = result.responses.into_iter().next() else {
            return Ok(Vec::new());
        };

        if let Some(error) = &annotation.error {
            warn!(code = error.code, message = %error.message, "Vision API reported an error");
            return Err(MeishiError::ocr_service(format!(
                "Vision API error {}: {}",
                error.code, error.message
            )));
        }

        let blocks = annotation.into_blocks();
        debug!(blocks = blocks.len(), "Vision annotation converted");
        Ok(blocks)
    }

    fn name(&self) -> &str {
        "google_vision"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key() -> OcrConfig {
        OcrConfig {
            api_key: Some("test-key".to_string()),
            endpoint: Some("http://localhost:9999/".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_endpoint_trailing_slash() {
        let ocr = GoogleVisionOcr::new(config_with_key()).unwrap();
        assert_eq!(ocr.annotate_url(), "http://localhost:9999/v1/images:annotate");
    }

    #[test]
    fn test_invalid_endpoint() {
        let config = OcrConfig {
            endpoint: Some("not a url".to_string()),
            ..config_with_key()
        };
        assert!(matches!(
            GoogleVisionOcr::new(config),
            Err(MeishiError::Configuration(_))
        ));
    }

    #[test]
    fn test_access_token_preferred() {
        let config = OcrConfig {
            access_token: Some("token".to_string()),
            ..config_with_key()
        };
        let ocr = GoogleVisionOcr::new(config).unwrap();
        assert!(matches!(ocr.credential, Credential::AccessToken(ref t) if t == "token"));
    }

    #[test]
    fn test_request_without_hints() {
        let ocr = GoogleVisionOcr::new(config_with_key()).unwrap();
        let request = ocr.build_request(b"abc", &[]);
        assert!(request.requests[0].image_context.is_none());
        assert_eq!(request.requests[0].image.content, "YWJj");
        assert_eq!(request.requests[0].features[0].feature_type, "DOCUMENT_TEXT_DETECTION");
    }
}
