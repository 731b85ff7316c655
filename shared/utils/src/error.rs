use lumber_models::AnalysisResult;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum EstimatorError {
    #[error("Incomplete dimensions: {message}")]
    IncompleteDimensions { message: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Extraction service error: {message}")]
    ExtractionService {
        message: String,
        /// Partial analysis, marked incomplete, when some of the document was usable.
        partial: Option<Box<AnalysisResult>>,
    },

    #[error("Extraction timed out after {seconds}s")]
    ExtractionTimeout { seconds: u64 },

    #[error("Extraction cancelled")]
    Cancelled,

    #[error("Cache corruption for key {key}: {message}")]
    CacheCorruption { key: String, message: String },

    #[error("Cache store error: {message}")]
    CacheStore { message: String },

    #[error("Catalog error: {message}")]
    Catalog { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl EstimatorError {
    pub fn incomplete_dimensions(message: impl Into<String>) -> Self {
        Self::IncompleteDimensions {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn extraction_service(message: impl Into<String>) -> Self {
        Self::ExtractionService {
            message: message.into(),
            partial: None,
        }
    }

    pub fn partial_extraction(message: impl Into<String>, partial: AnalysisResult) -> Self {
        Self::ExtractionService {
            message: message.into(),
            partial: Some(Box::new(partial)),
        }
    }

    pub fn cache_corruption(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CacheCorruption {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn cache_store(message: impl Into<String>) -> Self {
        Self::CacheStore {
            message: message.into(),
        }
    }

    pub fn catalog(message: impl Into<String>) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::IncompleteDimensions { .. } => "INCOMPLETE_DIMENSIONS",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::ExtractionService { .. } => "EXTRACTION_SERVICE_ERROR",
            Self::ExtractionTimeout { .. } => "EXTRACTION_TIMEOUT",
            Self::Cancelled => "CANCELLED",
            Self::CacheCorruption { .. } => "CACHE_CORRUPTION",
            Self::CacheStore { .. } => "CACHE_STORE_ERROR",
            Self::Catalog { .. } => "CATALOG_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Boundary failures the caller may reasonably retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ExtractionService { .. }
                | Self::ExtractionTimeout { .. }
                | Self::Cancelled
                | Self::CacheStore { .. }
        )
    }

    /// Partial analysis carried by an extraction failure, if any.
    pub fn partial_result(&self) -> Option<&AnalysisResult> {
        match self {
            Self::ExtractionService {
                partial: Some(partial),
                ..
            } => Some(partial),
            _ => None,
        }
    }
}

pub type EstimatorResult<T> = Result<T, EstimatorError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl From<EstimatorError> for ErrorResponse {
    fn from(error: EstimatorError) -> Self {
        let details = error
            .partial_result()
            .and_then(|partial| serde_json::to_value(partial).ok());

        Self {
            error: error.error_code().to_string(),
            code: error.error_code().to_string(),
            message: error.to_string(),
            details,
        }
    }
}

impl From<reqwest::Error> for EstimatorError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::extraction_service(format!("request timed out: {}", error))
        } else {
            Self::extraction_service(error.to_string())
        }
    }
}

impl From<serde_json::Error> for EstimatorError {
    fn from(error: serde_json::Error) -> Self {
        Self::validation("JSON", error.to_string())
    }
}

impl From<std::io::Error> for EstimatorError {
    fn from(error: std::io::Error) -> Self {
        Self::internal(error.to_string())
    }
}
