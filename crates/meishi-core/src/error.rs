//! Error types for meishi operations.
//!
//! Every variant carries a structured error code so callers (and the REST
//! layer) can tell a backend outage apart from a bad upload or a missing card.

use thiserror::Error;

/// Result type alias for meishi operations.
pub type MeishiResult<T> = Result<T, MeishiError>;

/// Main error type for all meishi operations.
#[derive(Error, Debug)]
pub enum MeishiError {
    /// The OCR backend reported a failure.
    #[error("OCR service error: {message}")]
    OcrService {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Authentication against the OCR backend failed.
    #[error("Authentication error: {message}")]
    Authentication {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Input validation failed.
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        code: ErrorCode,
        suggestion: Option<String>,
    },

    /// Stored card not found.
    #[error("Card not found: {message}")]
    NotFound {
        message: String,
        code: ErrorCode,
        card_id: Option<String>,
    },

    /// Card store operation failed.
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Network error.
    #[error("Network error: {message}")]
    Network {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Provider not supported.
    #[error("Provider not supported: {provider}")]
    UnsupportedProvider { provider: String },

    /// Parse error.
    #[error("Parse error: {message}")]
    Parse { message: String, code: ErrorCode },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // OCR (OCR_xxx)
    OcrBackendFailed,
    OcrInvalidResponse,

    // Authentication (AUTH_xxx)
    AuthInvalidKey,
    AuthMissingCredentials,

    // Validation (VAL_xxx)
    ValInvalidInput,
    ValEmptyImage,
    ValUnsupportedFormat,

    // Cards (CARD_xxx)
    CardNotFound,

    // Storage (STORE_xxx)
    StoreOperationFailed,

    // Network (NET_xxx)
    NetTimeout,
    NetConnectionFailed,

    // Parse (PARSE_xxx)
    ParseInvalidJson,
    ParseMissingField,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::OcrBackendFailed => "OCR_001",
            ErrorCode::OcrInvalidResponse => "OCR_002",
            ErrorCode::AuthInvalidKey => "AUTH_001",
            ErrorCode::AuthMissingCredentials => "AUTH_002",
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValEmptyImage => "VAL_002",
            ErrorCode::ValUnsupportedFormat => "VAL_003",
            ErrorCode::CardNotFound => "CARD_001",
            ErrorCode::StoreOperationFailed => "STORE_001",
            ErrorCode::NetTimeout => "NET_001",
            ErrorCode::NetConnectionFailed => "NET_002",
            ErrorCode::ParseInvalidJson => "PARSE_001",
            ErrorCode::ParseMissingField => "PARSE_002",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl MeishiError {
    /// Create an OCR backend error.
    pub fn ocr_service(message: impl Into<String>) -> Self {
        Self::OcrService {
            message: message.into(),
            code: ErrorCode::OcrBackendFailed,
            source: None,
        }
    }

    /// Create an OCR error for a response that could not be interpreted.
    pub fn ocr_invalid_response(message: impl Into<String>) -> Self {
        Self::OcrService {
            message: message.into(),
            code: ErrorCode::OcrInvalidResponse,
            source: None,
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
            suggestion: None,
        }
    }

    /// Create a validation error with a specific code and suggestion.
    pub fn validation_with_suggestion(
        message: impl Into<String>,
        code: ErrorCode,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            code,
            suggestion: Some(suggestion.into()),
        }
    }

    /// Create a not found error.
    pub fn not_found(card_id: impl Into<String>) -> Self {
        let id = card_id.into();
        Self::NotFound {
            message: format!("Card with id '{}' not found", id),
            code: ErrorCode::CardNotFound,
            card_id: Some(id),
        }
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            code: ErrorCode::StoreOperationFailed,
            source: None,
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            code: ErrorCode::NetConnectionFailed,
            source: None,
        }
    }

    /// Create a timeout error.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            code: ErrorCode::NetTimeout,
            source: None,
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            code: ErrorCode::ParseInvalidJson,
        }
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
            code: ErrorCode::AuthInvalidKey,
            source: None,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::OcrService { code, .. } => *code,
            Self::Authentication { code, .. } => *code,
            Self::Validation { code, .. } => *code,
            Self::NotFound { code, .. } => *code,
            Self::Storage { code, .. } => *code,
            Self::Network { code, .. } => *code,
            Self::Parse { code, .. } => *code,
            _ => ErrorCode::Internal,
        }
    }

    /// Whether retrying the same request later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::OcrService { .. } | Self::Network { .. })
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::OcrService { .. } => {
                Some("The text recognition service is unavailable, please retry shortly")
            }
            Self::Authentication { .. } => Some("Please check the OCR API key or access token"),
            Self::NotFound { .. } => Some("Please check the card ID and ensure it exists"),
            Self::Validation { suggestion, .. } => suggestion.as_deref(),
            Self::Network { .. } => Some("Please check network connectivity and retry"),
            _ => None,
        }
    }

    /// Convert from an HTTP status code returned by the OCR backend.
    pub fn from_http_status(status: u16, body: &str) -> Self {
        match status {
            400 => Self::OcrService {
                message: body.to_string(),
                code: ErrorCode::OcrInvalidResponse,
                source: None,
            },
            401 | 403 => Self::Authentication {
                message: body.to_string(),
                code: ErrorCode::AuthInvalidKey,
                source: None,
            },
            408 | 504 => Self::Network {
                message: body.to_string(),
                code: ErrorCode::NetTimeout,
                source: None,
            },
            _ => Self::OcrService {
                message: format!("HTTP {}: {}", status, body),
                code: ErrorCode::OcrBackendFailed,
                source: None,
            },
        }
    }
}
