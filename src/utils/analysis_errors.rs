// Error handling for the analysis API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::classifier::ClassifierError;
use crate::services::feature_extractor::ExtractionError;
use crate::utils::url_validator::ValidationError;

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Batch analysis is disabled")]
    BatchDisabled,

    #[error("Batch too large: {size} URLs (max {max})")]
    BatchTooLarge { size: usize, max: usize },

    #[error("Batch is empty")]
    EmptyBatch,

    #[error("Classifier unavailable: {0}")]
    ClassifierUnavailable(String),

    #[error("Internal server error")]
    InternalError,
}

// =============================================================================
// ERROR CONVERSIONS
// =============================================================================

impl From<ValidationError> for AnalysisError {
    fn from(err: ValidationError) -> Self {
        AnalysisError::InvalidUrl(err.to_string())
    }
}

impl From<ExtractionError> for AnalysisError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::InvalidUrl(msg) => AnalysisError::InvalidUrl(msg),
            ExtractionError::MissingHost(url) => {
                AnalysisError::InvalidUrl(format!("URL has no host: {}", url))
            },
        }
    }
}

impl From<ClassifierError> for AnalysisError {
    fn from(err: ClassifierError) -> Self {
        AnalysisError::ClassifierUnavailable(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AnalysisError {
    fn from(err: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors
                    .iter()
                    .map(move |e| format!("{}: {}", field, e.message.as_ref().unwrap_or(&e.code)))
            })
            .collect();

        AnalysisError::ValidationError(messages.join(", "))
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

#[derive(Debug, Serialize)]
pub struct AnalysisErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl AnalysisError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AnalysisError::InvalidUrl(_)
            | AnalysisError::ValidationError(_)
            | AnalysisError::BatchTooLarge { .. }
            | AnalysisError::EmptyBatch => StatusCode::BAD_REQUEST,

            AnalysisError::BatchDisabled => StatusCode::FORBIDDEN,

            AnalysisError::ClassifierUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,

            AnalysisError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AnalysisError::InvalidUrl(_) => "INVALID_URL",
            AnalysisError::ValidationError(_) => "VALIDATION_ERROR",
            AnalysisError::BatchDisabled => "BATCH_DISABLED",
            AnalysisError::BatchTooLarge { .. } => "BATCH_TOO_LARGE",
            AnalysisError::EmptyBatch => "EMPTY_BATCH",
            AnalysisError::ClassifierUnavailable(_) => "CLASSIFIER_UNAVAILABLE",
            AnalysisError::InternalError => "INTERNAL_ERROR",
        }
    }

    pub fn to_response(&self) -> AnalysisErrorResponse {
        let details = match self {
            AnalysisError::BatchTooLarge { size, max } => {
                Some(serde_json::json!({ "size": size, "max": max }))
            },
            AnalysisError::ValidationError(msg) => {
                Some(serde_json::json!({ "validation_errors": msg }))
            },
            _ => None,
        };

        AnalysisErrorResponse {
            error: self.to_string(),
            code: self.error_code().to_string(),
            details,
        }
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = self.to_response();

        (status, Json(body)).into_response()
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

// =============================================================================
// TESTS
// =============================================================================
