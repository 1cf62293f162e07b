//! Upload payload sniffing.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::error::{ErrorCode, MeishiError, MeishiResult};

/// Image formats accepted by the OCR backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
    Bmp,
    Tiff,
}

impl ImageFormat {
    /// Detect the format from magic numbers.
    pub fn detect(content: &[u8]) -> MeishiResult<Self> {
        if content.is_empty() {
            return Err(MeishiError::validation_with_suggestion(
                "Image payload is empty",
                ErrorCode::ValEmptyImage,
                "Attach a photo of the business card",
            ));
        }
        if content.len() < 8 {
            return Err(unsupported("Content too short to detect format"));
        }

        if content.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Ok(Self::Jpeg)
        } else if content.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            Ok(Self::Png)
        } else if content.starts_with(b"GIF87a") || content.starts_with(b"GIF89a") {
            Ok(Self::Gif)
        } else if content.starts_with(b"RIFF") && content.len() > 12 && &content[8..12] == b"WEBP"
        {
            Ok(Self::Webp)
        } else if content.starts_with(b"BM") {
            Ok(Self::Bmp)
        } else if content.starts_with(b"II*\0") || content.starts_with(b"MM\0*") {
            Ok(Self::Tiff)
        } else {
            Err(unsupported("Unknown image format"))
        }
    }

    /// MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
            Self::Bmp => "image/bmp",
            Self::Tiff => "image/tiff",
        }
    }
}

fn unsupported(message: &str) -> MeishiError {
    MeishiError::validation_with_suggestion(
        message,
        ErrorCode::ValUnsupportedFormat,
        "Send the card photo as JPEG or PNG",
    )
}
