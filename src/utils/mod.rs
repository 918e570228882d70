// Utility modules for PhishGuard Backend

pub mod analysis_errors;
pub mod url_validator;

pub use analysis_errors::{AnalysisError, AnalysisErrorResponse, AnalysisResult};
pub use url_validator::{normalize_and_validate, ValidationError, MAX_URL_LENGTH};
