// Phishing classifier service
// Standardization + bagged decision trees over the fixed feature vector.
// Artifacts are loaded from MODEL_DIR on first use, or trained from the
// synthetic corpus and persisted when they are missing or unreadable.

pub mod artifacts;
pub mod forest;
pub mod scaler;
pub mod training;
pub mod vector;

use once_cell::sync::OnceCell;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, error, info, warn};

pub use artifacts::ModelArtifacts;
pub use forest::{ForestModel, ForestParams};
pub use scaler::StandardScaler;
pub use vector::{build_feature_vector, default_feature_names, VectorError, FEATURE_NAMES};

use crate::models::features::FeatureSet;
use crate::models::verdict::Prediction;

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("Model artifact error: {0}")]
    Artifact(String),

    #[error("Model serialization error: {0}")]
    Serialization(String),

    #[error("Model training failed: {0}")]
    Training(String),

    #[error("Training corpus is empty")]
    EmptyCorpus,
}

// =============================================================================
// CONFIGURATION
// =============================================================================

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub model_dir: PathBuf,
    pub forest: ForestParams,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("ml_model"),
            forest: ForestParams::default(),
        }
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Fitted artifacts held in memory after initialization
#[derive(Debug)]
pub struct ClassifierState {
    pub scaler: StandardScaler,
    pub model: ForestModel,
    pub feature_names: Vec<String>,
    pub origin: ModelOrigin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelOrigin {
    Loaded,
    Trained,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierStatus {
    Uninitialized,
    Ready,
}

impl ClassifierState {
    fn from_artifacts(artifacts: ModelArtifacts, origin: ModelOrigin) -> Self {
        Self {
            scaler: artifacts.scaler,
            model: artifacts.model,
            feature_names: artifacts.feature_names,
            origin,
        }
    }

    pub fn predict(&self, features: &FeatureSet) -> Result<Prediction, VectorError> {
        let vector = build_feature_vector(features, &self.feature_names)?;
        let scaled = self.scaler.transform(&vector)?;
        Ok(self.model.predict(scaled.view()))
    }
}

/// Fit scaler and forest on the synthetic corpus
pub fn train_bootstrap(params: &ForestParams) -> Result<ModelArtifacts, ClassifierError> {
    let (records, targets) = training::synthetic_corpus();
    if records.nrows() == 0 {
        return Err(ClassifierError::EmptyCorpus);
    }

    let scaler = StandardScaler::fit(&records)?;
    let scaled = scaler.transform_records(&records);
    let model = ForestModel::fit(&scaled, &targets, params)?;

    Ok(ModelArtifacts {
        scaler,
        model,
        feature_names: default_feature_names(),
    })
}

// =============================================================================
// SERVICE
// =============================================================================

/// Owned by the composition root and shared by handle; initialization runs once
pub struct PhishingClassifier {
    config: ClassifierConfig,
    state: OnceCell<ClassifierState>,
}

impl PhishingClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            state: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Load or train exactly once. Concurrent callers block until the first finishes.
    /// Blocking: call from `spawn_blocking` inside async code.
    pub fn initialize(&self) -> Result<&ClassifierState, ClassifierError> {
        self.state.get_or_try_init(|| self.load_or_train())
    }

    fn load_or_train(&self) -> Result<ClassifierState, ClassifierError> {
        let dir = &self.config.model_dir;

        match ModelArtifacts::load(dir) {
            Ok(artifacts) => {
                info!(
                    "Loaded classifier from {} ({} trees)",
                    dir.display(),
                    artifacts.model.trees.len()
                );
                return Ok(ClassifierState::from_artifacts(artifacts, ModelOrigin::Loaded));
            },
            Err(e) if ModelArtifacts::exists(dir) => {
                warn!("Persisted classifier unusable, retraining: {}", e);
            },
            Err(_) => {
                info!("No persisted classifier in {}, training bootstrap model", dir.display());
            },
        }

        let artifacts = train_bootstrap(&self.config.forest).map_err(|e| {
            error!("Bootstrap training failed: {}", e);
            e
        })?;
        info!(
            "Trained bootstrap classifier with {} trees",
            artifacts.model.trees.len()
        );

        if let Err(e) = artifacts.save(dir) {
            warn!("Failed to persist classifier to {}: {}", dir.display(), e);
        } else {
            info!("Persisted classifier to {}", dir.display());
        }

        Ok(ClassifierState::from_artifacts(artifacts, ModelOrigin::Trained))
    }

    pub fn state(&self) -> Option<&ClassifierState> {
        self.state.get()
    }

    pub fn is_ready(&self) -> bool {
        self.state.get().is_some()
    }

    pub fn status(&self) -> ClassifierStatus {
        if self.is_ready() {
            ClassifierStatus::Ready
        } else {
            ClassifierStatus::Uninitialized
        }
    }

    /// Classify one feature set. Vector problems yield the neutral prediction.
    pub fn predict(&self, features: &FeatureSet) -> Result<Prediction, ClassifierError> {
        let state = self.initialize()?;

        match state.predict(features) {
            Ok(prediction) => {
                debug!(
                    "Classified {}: phishing={} confidence={:.3}",
                    features.domain, prediction.is_phishing, prediction.confidence
                );
                Ok(prediction)
            },
            Err(e) => {
                warn!("Feature vector for {} unusable, neutral prediction: {}", features.domain, e);
                Ok(Prediction::neutral())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::features::{DomainShape, RedirectProbe, TlsProbe};
    use ndarray::Array1;

    fn test_config() -> ClassifierConfig {
        ClassifierConfig {
            model_dir: std::env::temp_dir()
                .join(format!("phishguard-classifier-{}", uuid::Uuid::new_v4())),
            forest: ForestParams {
                n_trees: 25,
                ..ForestParams::default()
            },
        }
    }

    fn features_for(url: &str, tls: bool, hops: usize) -> FeatureSet {
        let shape = DomainShape::parse(url).unwrap();
        let tls = if tls {
            TlsProbe::Established { issuer: None }
        } else {
            TlsProbe::Degraded {
                reason: "refused".to_string(),
            }
        };
        let mut chain = vec![url.to_string()];
        chain.extend((0..hops).map(|i| format!("http://hop{}.example/", i)));
        FeatureSet::assemble(url, shape, tls, RedirectProbe::Complete { chain }, false)
    }

    #[test]
    fn test_prototypes_classify_as_labelled() {
        let artifacts = train_bootstrap(&test_config().forest).unwrap();
        let state = ClassifierState::from_artifacts(artifacts, ModelOrigin::Trained);

        for row in training::legitimate_prototypes() {
            let scaled = state.scaler.transform(row).unwrap();
            let prediction = state.model.predict(scaled.view());
            assert!(!prediction.is_phishing, "legitimate prototype {:?}", row);
            assert!(prediction.confidence > 0.8);
        }
        for row in training::phishing_prototypes() {
            let scaled = state.scaler.transform(row).unwrap();
            let prediction = state.model.predict(scaled.view());
            assert!(prediction.is_phishing, "phishing prototype {:?}", row);
            assert!(prediction.confidence > 0.8);
        }
    }

    #[test]
    fn test_initialize_trains_once_and_persists() {
        let config = test_config();
        let dir = config.model_dir.clone();
        let classifier = PhishingClassifier::new(config);
        assert_eq!(classifier.status(), ClassifierStatus::Uninitialized);

        let first = classifier.initialize().unwrap() as *const ClassifierState;
        let second = classifier.initialize().unwrap() as *const ClassifierState;
        assert_eq!(first, second);
        assert_eq!(classifier.status(), ClassifierStatus::Ready);
        assert_eq!(classifier.state().unwrap().origin, ModelOrigin::Trained);
        assert!(ModelArtifacts::exists(&dir));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_predict_confidence_in_range() {
        let classifier = PhishingClassifier::new(test_config());
        let features = features_for("http://login-secure.example.com/a@b?x=1", false, 3);
        let prediction = classifier.predict(&features).unwrap();
        assert!((0.5..=1.0).contains(&prediction.confidence));

        let _ = std::fs::remove_dir_all(&classifier.config().model_dir);
    }

    #[test]
    fn test_unknown_manifest_feature_yields_neutral() {
        let mut artifacts = train_bootstrap(&test_config().forest).unwrap();
        artifacts.feature_names[0] = "page_rank".to_string();
        let state = ClassifierState::from_artifacts(artifacts, ModelOrigin::Loaded);

        let features = features_for("https://example.com/", true, 0);
        assert_eq!(
            state.predict(&features),
            Err(VectorError::UnknownFeature("page_rank".to_string()))
        );
    }

    #[test]
    fn test_bootstrap_matches_manual_fit() {
        let params = ForestParams {
            n_trees: 5,
            ..ForestParams::default()
        };
        let artifacts = train_bootstrap(&params).unwrap();
        assert_eq!(artifacts.feature_names.len(), FEATURE_NAMES.len());
        assert_eq!(artifacts.scaler.dimensions(), FEATURE_NAMES.len());
        assert_eq!(artifacts.model.trees.len(), 5);
        assert!(artifacts.validate().is_ok());

        let (_, targets): (_, Array1<usize>) = training::synthetic_corpus();
        assert_eq!(targets.len(), 1000);
    }
}
