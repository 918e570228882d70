// Common test utilities shared across integration tests
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
    Router,
};
use phishguard_backend_core::{
    app::{create_router, AppState},
    app_config::{AppConfig, BatchSettings, Environment, ModelSettings, ProbeSettings},
    services::{FixedSiteProbe, SiteProbe},
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower::util::ServiceExt;
use uuid::Uuid;

/// Unique model directory for test isolation
pub fn temp_model_dir(prefix: &str) -> PathBuf {
    std::env::temp_dir().join(format!("phishguard-{}-{}", prefix, Uuid::new_v4().simple()))
}

/// Configuration with a small forest, probes off and a private model directory
pub fn test_config(model_dir: PathBuf) -> AppConfig {
    AppConfig {
        bind_address: "127.0.0.1:0".to_string(),
        environment: Environment::Test,
        rust_log: "debug".to_string(),
        cors_allowed_origins: vec!["*".to_string()],
        model: ModelSettings {
            model_dir,
            forest_trees: 15,
            forest_max_depth: 15,
            forest_min_samples_split: 5,
            forest_min_samples_leaf: 2,
            training_seed: 42,
        },
        probe: ProbeSettings {
            enabled: false,
            timeout_secs: 1,
            max_redirects: 5,
            tls_port: 443,
            user_agent: "PhishGuard-Test/1.0".to_string(),
        },
        batch: BatchSettings {
            enabled: true,
            max_size: 5,
            concurrency: 4,
        },
    }
}

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub model_dir: PathBuf,
}

impl TestApp {
    /// Send a POST request
    pub fn post(&self, uri: &str) -> TestRequest {
        TestRequest::new(self, "POST", uri)
    }

    /// Send a GET request
    pub fn get(&self, uri: &str) -> TestRequest {
        TestRequest::new(self, "GET", uri)
    }

    pub fn cleanup(&self) {
        let _ = std::fs::remove_dir_all(&self.model_dir);
    }
}

/// Test request builder
pub struct TestRequest<'a> {
    app: &'a TestApp,
    request: Request<Body>,
}

impl<'a> TestRequest<'a> {
    fn new(app: &'a TestApp, method: &str, uri: &str) -> Self {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        Self { app, request }
    }

    /// Add JSON body to request
    pub fn json<T: Serialize>(self, body: &T) -> Self {
        let body_bytes = serde_json::to_vec(body).unwrap();
        self.raw_json(body_bytes)
    }

    /// Add a body sent as JSON without serializing it
    pub fn raw_json(mut self, body: impl Into<Body>) -> Self {
        self.request = Request::builder()
            .method(self.request.method().clone())
            .uri(self.request.uri().clone())
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap();
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.request.headers_mut().insert(
            axum::http::HeaderName::from_bytes(name.as_bytes()).unwrap(),
            axum::http::HeaderValue::from_str(value).unwrap(),
        );
        self
    }

    /// Send the request
    pub async fn send(self) -> TestResponse {
        let response = self.app.app.clone().oneshot(self.request).await.unwrap();
        TestResponse { response }
    }
}

/// Test response wrapper
pub struct TestResponse {
    response: Response<Body>,
}

impl TestResponse {
    /// Get status code
    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.response
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    }

    /// Parse JSON response
    pub async fn json<T: serde::de::DeserializeOwned>(self) -> T {
        let body = axum::body::to_bytes(self.response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }
}

/// Setup test application around the given probe
pub fn setup_test_app_with_probe(probe: Arc<dyn SiteProbe>) -> TestApp {
    let model_dir = temp_model_dir("api");
    let state = AppState::with_probe(test_config(model_dir.clone()), probe);
    let app = create_router(state.clone());

    TestApp {
        app,
        state,
        model_dir,
    }
}

/// Setup test application with every network probe degraded
pub fn setup_test_app() -> TestApp {
    setup_test_app_with_probe(Arc::new(FixedSiteProbe::unreachable()))
}
