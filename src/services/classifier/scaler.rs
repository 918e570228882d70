// Per-feature standardization fitted once on the training corpus

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use super::vector::VectorError;
use super::ClassifierError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    /// Population standard deviation; constant columns use 1.0
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(records: &Array2<f64>) -> Result<Self, ClassifierError> {
        let mean = records
            .mean_axis(Axis(0))
            .ok_or(ClassifierError::EmptyCorpus)?;
        let std = records.std_axis(Axis(0), 0.0);

        let scale = std
            .iter()
            .map(|&s| if s > f64::EPSILON { s } else { 1.0 })
            .collect();

        Ok(Self {
            mean: mean.to_vec(),
            scale,
        })
    }

    pub fn dimensions(&self) -> usize {
        self.mean.len()
    }

    pub fn transform(&self, vector: &[f64]) -> Result<Array1<f64>, VectorError> {
        if vector.len() != self.dimensions() {
            return Err(VectorError::LengthMismatch {
                expected: self.dimensions(),
                actual: vector.len(),
            });
        }

        Ok(vector
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(value, (mean, scale))| (value - mean) / scale)
            .collect())
    }

    pub fn transform_records(&self, records: &Array2<f64>) -> Array2<f64> {
        let mean = Array1::from(self.mean.clone());
        let scale = Array1::from(self.scale.clone());
        (records - &mean) / &scale
    }
}
