// Library exports for PhishGuard Backend
// This file exposes modules and functions for library consumers

pub mod app;
pub mod app_config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use app::{create_router, AppState};
pub use app_config::{AppConfig, CONFIG};
pub use models::{FeatureSet, Prediction, ThreatLevel, Verdict};
pub use services::{
    AnalysisService, ClassifierConfig, ClassifierError, FeatureExtractor, PhishingClassifier,
    SiteProbe,
};
pub use utils::{AnalysisError, ValidationError};

// Library initialization function for external consumers
pub async fn initialize_app_state() -> Result<AppState, Box<dyn std::error::Error + Send + Sync>> {
    use std::sync::Arc;
    use tracing::info;

    // Load environment
    dotenv::dotenv().ok();

    // Initialize config
    let config = app_config::config();

    info!("Initializing analysis services...");
    let state = AppState::from_config(config.clone())?;

    // Load or train the classifier before serving traffic
    let classifier = Arc::clone(&state.classifier);
    let origin = tokio::task::spawn_blocking(move || {
        classifier.initialize().map(|ready| ready.origin)
    })
    .await??;
    info!("Classifier ready ({:?})", origin);

    Ok(state)
}
