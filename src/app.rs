// Application state and composition root
use std::sync::Arc;

use axum::{middleware::from_fn_with_state, Router};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    app_config::AppConfig,
    handlers,
    middleware::cors_middleware,
    services::{
        AnalysisService, FeatureExtractor, FixedSiteProbe, LiveSiteProbe, PhishingClassifier,
        ProbeError, SiteProbe,
    },
};

// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub analysis_service: Arc<AnalysisService>,
    pub classifier: Arc<PhishingClassifier>,
}

impl AppState {
    /// Wire services from configuration. The classifier is built but not yet initialized.
    pub fn from_config(config: AppConfig) -> Result<Self, ProbeError> {
        let probe: Arc<dyn SiteProbe> = if config.probe.enabled {
            Arc::new(LiveSiteProbe::new(config.probe_config())?)
        } else {
            info!("Network probes disabled, TLS and redirect features will degrade");
            Arc::new(FixedSiteProbe::unreachable())
        };

        Ok(Self::with_probe(config, probe))
    }

    /// Wire services around an explicit probe implementation
    pub fn with_probe(config: AppConfig, probe: Arc<dyn SiteProbe>) -> Self {
        let classifier = Arc::new(PhishingClassifier::new(config.classifier_config()));
        let analysis_service = Arc::new(AnalysisService::new(
            FeatureExtractor::new(probe),
            Arc::clone(&classifier),
            config.batch_config(),
        ));

        Self {
            config: Arc::new(config),
            analysis_service,
            classifier,
        }
    }
}

/// Full router with tracing and CORS applied
pub fn create_router(state: AppState) -> Router {
    handlers::analysis_routes()
        .layer(from_fn_with_state(state.clone(), cors_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
