// Bagged decision-tree ensemble
// Each member is a linfa decision tree fitted on a bootstrap sample of the rows
// and a random subset of the feature columns. Prediction is a majority vote.

use linfa::prelude::*;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::ClassifierError;
use crate::models::verdict::Prediction;

pub const PHISHING_LABEL: usize = 1;
pub const LEGITIMATE_LABEL: usize = 0;

#[derive(Debug, Clone, PartialEq)]
pub struct ForestParams {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Columns offered to each tree; `None` uses ceil(sqrt(n_features))
    pub max_features: Option<usize>,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 15,
            min_samples_split: 5,
            min_samples_leaf: 2,
            max_features: None,
            seed: 42,
        }
    }
}

impl ForestParams {
    fn features_per_tree(&self, n_features: usize) -> usize {
        let requested = self
            .max_features
            .unwrap_or_else(|| (n_features as f64).sqrt().ceil() as usize);
        requested.clamp(1, n_features)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaggedTree {
    /// Column indices (into the full scaled vector) this tree was fitted on
    pub features: Vec<usize>,
    pub tree: DecisionTree<f64, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestModel {
    pub n_features: usize,
    pub trees: Vec<BaggedTree>,
}

impl ForestModel {
    pub fn fit(
        records: &Array2<f64>,
        targets: &Array1<usize>,
        params: &ForestParams,
    ) -> Result<Self, ClassifierError> {
        let (n_rows, n_features) = records.dim();
        if n_rows == 0 || n_features == 0 {
            return Err(ClassifierError::EmptyCorpus);
        }
        if targets.len() != n_rows {
            return Err(ClassifierError::Training(format!(
                "{} records but {} targets",
                n_rows,
                targets.len()
            )));
        }
        if params.n_trees == 0 {
            return Err(ClassifierError::Training(
                "forest needs at least one tree".to_string(),
            ));
        }

        let per_tree = params.features_per_tree(n_features);
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_trees);

        for _ in 0..params.n_trees {
            let rows: Vec<usize> = (0..n_rows).map(|_| rng.gen_range(0..n_rows)).collect();
            let mut features = index::sample(&mut rng, n_features, per_tree).into_vec();
            features.sort_unstable();

            let sample = records.select(Axis(0), &rows).select(Axis(1), &features);
            let labels = targets.select(Axis(0), &rows);
            let dataset = Dataset::new(sample, labels);

            let tree = DecisionTree::params()
                .max_depth(Some(params.max_depth))
                .min_weight_split(params.min_samples_split as f32)
                .min_weight_leaf(params.min_samples_leaf as f32)
                .fit(&dataset)
                .map_err(|e: linfa::error::Error| ClassifierError::Training(e.to_string()))?;

            trees.push(BaggedTree { features, tree });
        }

        debug!(
            "Fitted forest of {} trees over {} rows ({} of {} features per tree)",
            trees.len(),
            n_rows,
            per_tree,
            n_features
        );

        Ok(Self { n_features, trees })
    }

    /// Structural check for a model read back from disk
    pub fn validate(&self, n_features: usize) -> Result<(), ClassifierError> {
        if self.trees.is_empty() {
            return Err(ClassifierError::Artifact("model has no trees".to_string()));
        }
        if self.n_features != n_features {
            return Err(ClassifierError::Artifact(format!(
                "model expects {} features, manifest lists {}",
                self.n_features, n_features
            )));
        }
        if self
            .trees
            .iter()
            .any(|t| t.features.is_empty() || t.features.iter().any(|&f| f >= n_features))
        {
            return Err(ClassifierError::Artifact(
                "tree references a feature outside the vector".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of trees voting phishing for one scaled vector
    pub fn phishing_votes(&self, scaled: ArrayView1<f64>) -> usize {
        self.trees
            .iter()
            .filter(|member| {
                let row = scaled.select(Axis(0), &member.features).insert_axis(Axis(0));
                let labels: Array1<usize> = member.tree.predict(&row);
                labels.first() == Some(&PHISHING_LABEL)
            })
            .count()
    }

    /// Majority vote; confidence is the share of trees agreeing with the result.
    /// A tie resolves to legitimate.
    pub fn predict(&self, scaled: ArrayView1<f64>) -> Prediction {
        let total = self.trees.len();
        if total == 0 {
            return Prediction::neutral();
        }

        let votes = self.phishing_votes(scaled);
        let phishing_share = votes as f64 / total as f64;
        let is_phishing = votes * 2 > total;

        Prediction {
            is_phishing,
            confidence: if is_phishing {
                phishing_share
            } else {
                1.0 - phishing_share
            },
        }
    }
}
