// HTTP handlers for PhishGuard Backend

pub mod analysis;

use crate::app::AppState;
use axum::{
    routing::{get, post},
    Router,
};

// Status and analysis routes
pub fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(analysis::root))
        .route("/health", get(analysis::health_check))
        .route("/api/analyze", post(analysis::analyze_url))
        .route("/api/batch-analyze", post(analysis::batch_analyze))
}
