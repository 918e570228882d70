// Analysis API endpoints
// Thin HTTP layer: validation and status mapping here, decisions in services

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::{info, warn};
use validator::Validate;

use crate::{
    app::AppState,
    models::analysis::{AnalyzeRequest, BatchAnalyzeResponse},
    services::ClassifierStatus,
    utils::analysis_errors::AnalysisError,
};

// =============================================================================
// STATUS HANDLERS
// =============================================================================

/// GET /
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "status": "PhishGuard AI is running",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.classifier.status();

    Json(json!({
        "status": "healthy",
        "service": "phishguard-backend",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "model_loaded": status == ClassifierStatus::Ready,
        "model_status": status,
    }))
}

// =============================================================================
// ANALYSIS HANDLERS
// =============================================================================

/// Analyze a single URL
/// POST /api/analyze
pub async fn analyze_url(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    if let Err(e) = request.validate() {
        return AnalysisError::from(e).into_response();
    }

    match state.analysis_service.analyze_input(&request.url).await {
        Ok(verdict) => (StatusCode::OK, Json(verdict)).into_response(),
        Err(e) => {
            warn!("Analysis of {} rejected: {}", request.url, e);
            e.into_response()
        },
    }
}

/// Analyze a list of URLs, each independently
/// POST /api/batch-analyze
pub async fn batch_analyze(
    State(state): State<AppState>,
    Json(urls): Json<Vec<String>>,
) -> impl IntoResponse {
    info!("Batch analysis requested for {} URLs", urls.len());

    match state.analysis_service.analyze_batch(urls).await {
        Ok(results) => {
            let total = results.len();
            (
                StatusCode::OK,
                Json(BatchAnalyzeResponse { results, total }),
            )
                .into_response()
        },
        Err(e) => e.into_response(),
    }
}
