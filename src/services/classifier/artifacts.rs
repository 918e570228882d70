// On-disk classifier artifacts
// Three JSON files under the model directory: fitted forest, fitted scaler,
// and the feature-name manifest that fixes the vector layout.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::forest::ForestModel;
use super::scaler::StandardScaler;
use super::ClassifierError;

pub const MODEL_FILE: &str = "phishing_model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const FEATURES_FILE: &str = "features.json";

#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub scaler: StandardScaler,
    pub model: ForestModel,
    pub feature_names: Vec<String>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ClassifierError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| ClassifierError::Artifact(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&raw)
        .map_err(|e| ClassifierError::Serialization(format!("{}: {}", path.display(), e)))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ClassifierError> {
    let raw = serde_json::to_string(value)
        .map_err(|e| ClassifierError::Serialization(format!("{}: {}", path.display(), e)))?;
    fs::write(path, raw)
        .map_err(|e| ClassifierError::Artifact(format!("{}: {}", path.display(), e)))
}

impl ModelArtifacts {
    pub fn paths(dir: &Path) -> [PathBuf; 3] {
        [
            dir.join(MODEL_FILE),
            dir.join(SCALER_FILE),
            dir.join(FEATURES_FILE),
        ]
    }

    pub fn exists(dir: &Path) -> bool {
        Self::paths(dir).iter().all(|p| p.is_file())
    }

    /// Read and cross-check all three files
    pub fn load(dir: &Path) -> Result<Self, ClassifierError> {
        let [model_path, scaler_path, features_path] = Self::paths(dir);

        let feature_names: Vec<String> = read_json(&features_path)?;
        let scaler: StandardScaler = read_json(&scaler_path)?;
        let model: ForestModel = read_json(&model_path)?;

        let artifacts = Self {
            scaler,
            model,
            feature_names,
        };
        artifacts.validate()?;
        Ok(artifacts)
    }

    pub fn validate(&self) -> Result<(), ClassifierError> {
        let n = self.feature_names.len();
        if n == 0 {
            return Err(ClassifierError::Artifact("feature manifest is empty".to_string()));
        }
        if self.scaler.mean.len() != n || self.scaler.scale.len() != n {
            return Err(ClassifierError::Artifact(format!(
                "scaler has {}/{} columns, manifest lists {}",
                self.scaler.mean.len(),
                self.scaler.scale.len(),
                n
            )));
        }
        if self.scaler.scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
            return Err(ClassifierError::Artifact(
                "scaler has a zero or non-finite scale".to_string(),
            ));
        }
        self.model.validate(n)
    }

    pub fn save(&self, dir: &Path) -> Result<(), ClassifierError> {
        fs::create_dir_all(dir)
            .map_err(|e| ClassifierError::Artifact(format!("{}: {}", dir.display(), e)))?;

        let [model_path, scaler_path, features_path] = Self::paths(dir);
        write_json(&model_path, &self.model)?;
        write_json(&scaler_path, &self.scaler)?;
        // Manifest last: a partial write leaves the directory unloadable rather than inconsistent
        write_json(&features_path, &self.feature_names)
    }
}
