//! Random forest classifier for binary text labels
//!
//! A bagged ensemble of `linfa-trees` Gini trees. Each tree is fitted on a
//! bootstrap sample where a row's weight is its class-balanced weight times the
//! number of times it was drawn. Class probabilities are the share of trees
//! voting for each class; with unpruned trees the leaves are pure, so this
//! matches averaging the leaf distributions.

use linfa::prelude::*;
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::{Array1, Array2, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::config::ClassifierConfig;
use super::errors::{Result, ScoringError};
use super::features::FeatureVector;

const N_CLASSES: usize = 2;

/// Bagged ensemble of Gini trees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    trees: Vec<DecisionTree<f64, usize>>,
    n_features: usize,
}

impl RandomForestClassifier {
    /// Fit on dense vectors with binary labels
    pub fn fit(x: &[FeatureVector], y: &[u8], config: &ClassifierConfig) -> Result<Self> {
        if x.is_empty() || x.len() != y.len() {
            return Err(ScoringError::Training(format!(
                "feature rows ({}) and labels ({}) must be non-empty and aligned",
                x.len(),
                y.len()
            )));
        }
        let n_features = x[0].len();
        if n_features == 0 || x.iter().any(|row| row.len() != n_features) {
            return Err(ScoringError::Training("feature rows must share a non-zero width".to_string()));
        }
        if y.iter().any(|&label| label as usize >= N_CLASSES) {
            return Err(ScoringError::Training("labels must be 0 or 1".to_string()));
        }

        let class_weights = balanced_class_weights(y)?;
        let params = DecisionTree::<f64, usize>::params()
            .split_quality(SplitQuality::Gini)
            .max_depth(Some(config.max_depth));
        let n = x.len();
        let mut rng = StdRng::seed_from_u64(config.seed);

        let mut trees = Vec::with_capacity(config.n_estimators);
        for _ in 0..config.n_estimators {
            let mut counts = vec![0usize; n];
            for _ in 0..n {
                counts[rng.gen_range(0..n)] += 1;
            }
            let drawn: Vec<usize> = (0..n).filter(|&r| counts[r] > 0).collect();

            let records = to_records(drawn.iter().map(|&r| &x[r]), drawn.len(), n_features)?;
            let targets: Array1<usize> = drawn.iter().map(|&r| y[r] as usize).collect();
            let weights: Array1<f32> = drawn
                .iter()
                .map(|&r| (counts[r] as f64 * class_weights[y[r] as usize]) as f32)
                .collect();

            let dataset = Dataset::new(records, targets).with_weights(weights);
            let tree = params
                .fit(&dataset)
                .map_err(|e| ScoringError::Training(format!("decision tree: {}", e)))?;
            trees.push(tree);
        }

        Ok(Self { trees, n_features })
    }

    /// `[p_class0, p_class1]`, summing to 1
    pub fn predict_proba(&self, x: &[f64]) -> [f64; N_CLASSES] {
        if self.trees.is_empty() {
            return [0.5, 0.5];
        }
        let mut row = vec![0.0; self.n_features];
        for (slot, value) in row.iter_mut().zip(x) {
            *slot = *value;
        }
        let record = match ArrayView2::from_shape((1, self.n_features), &row) {
            Ok(record) => record,
            Err(_) => return [0.5, 0.5],
        };

        let votes = self
            .trees
            .iter()
            .filter(|tree| tree.predict(&record).get(0).copied() == Some(1))
            .count();
        let p_positive = votes as f64 / self.trees.len() as f64;
        [1.0 - p_positive, p_positive]
    }

    /// Class with the larger probability; ties go to class 0
    pub fn predict(&self, x: &[f64]) -> u8 {
        let p = self.predict_proba(x);
        if p[1] > p[0] {
            1
        } else {
            0
        }
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

fn to_records<'a>(rows: impl Iterator<Item = &'a FeatureVector>, n_rows: usize, n_features: usize) -> Result<Array2<f64>> {
    let flat: Vec<f64> = rows.flat_map(|row| row.iter().copied()).collect();
    Array2::from_shape_vec((n_rows, n_features), flat)
        .map_err(|e| ScoringError::Training(format!("feature matrix: {}", e)))
}

/// `n / (n_classes * count_c)`; both classes must be present
fn balanced_class_weights(y: &[u8]) -> Result<[f64; N_CLASSES]> {
    let mut counts = [0usize; N_CLASSES];
    for &label in y {
        counts[label as usize] += 1;
    }
    if counts.iter().any(|&c| c == 0) {
        return Err(ScoringError::Training("training labels contain a single class".to_string()));
    }
    let n = y.len() as f64;
    Ok([
        n / (N_CLASSES as f64 * counts[0] as f64),
        n / (N_CLASSES as f64 * counts[1] as f64),
    ])
}
