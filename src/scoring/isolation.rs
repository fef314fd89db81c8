//! Isolation forest over login feature vectors
//!
//! Anomalies are isolated in fewer random splits. `score_samples` follows the
//! usual convention: values lie in [-1, 0) and more negative means more anomalous.
//! The decision offset is fixed at fit time from the contamination ratio.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::config::AnomalyModelConfig;
use super::errors::{Result, ScoringError};
use super::features::FeatureVector;

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum IsoNode {
    Leaf {
        size: usize,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct IsolationTree {
    nodes: Vec<IsoNode>,
}

impl IsolationTree {
    fn grow(x: &[FeatureVector], rows: &[usize], height_limit: usize, rng: &mut StdRng) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.build(x, rows.to_vec(), 0, height_limit, rng);
        tree
    }

    fn build(&mut self, x: &[FeatureVector], rows: Vec<usize>, depth: usize, height_limit: usize, rng: &mut StdRng) -> usize {
        let id = self.nodes.len();
        if depth >= height_limit || rows.len() <= 1 {
            self.nodes.push(IsoNode::Leaf { size: rows.len() });
            return id;
        }

        let n_features = x[rows[0]].len();
        let mut features: Vec<usize> = (0..n_features).collect();
        features.shuffle(rng);

        let mut chosen = None;
        for feature in features {
            let (lo, hi) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &r| {
                (lo.min(x[r][feature]), hi.max(x[r][feature]))
            });
            if hi > lo {
                chosen = Some((feature, rng.gen_range(lo..hi)));
                break;
            }
        }

        let (feature, threshold) = match chosen {
            Some(split) => split,
            None => {
                self.nodes.push(IsoNode::Leaf { size: rows.len() });
                return id;
            }
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) =
            rows.into_iter().partition(|&r| x[r][feature] <= threshold);

        self.nodes.push(IsoNode::Leaf { size: 0 });
        let left = self.build(x, left_rows, depth + 1, height_limit, rng);
        let right = self.build(x, right_rows, depth + 1, height_limit, rng);
        self.nodes[id] = IsoNode::Split { feature, threshold, left, right };
        id
    }

    /// Depth of the leaf reached plus the expected remaining path for its size
    fn path_length(&self, sample: &[f64]) -> f64 {
        let mut idx = 0;
        let mut depth = 0.0;
        loop {
            match &self.nodes[idx] {
                IsoNode::Leaf { size } => return depth + average_path_length(*size),
                IsoNode::Split { feature, threshold, left, right } => {
                    let value = sample.get(*feature).copied().unwrap_or(0.0);
                    idx = if value <= *threshold { *left } else { *right };
                    depth += 1.0;
                }
            }
        }
    }
}

/// Average unsuccessful-search path length in a binary search tree of `n` nodes
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Decision of the isolation forest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Normal,
    Anomalous,
}

/// Fitted isolation forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    max_samples: usize,
    n_features: usize,
    offset: f64,
    contamination: f64,
}

impl IsolationForest {
    /// Fit on unlabeled rows
    pub fn fit(x: &[FeatureVector], config: &AnomalyModelConfig) -> Result<Self> {
        if x.len() < 2 {
            return Err(ScoringError::Training("isolation forest needs at least two rows".to_string()));
        }
        let n_features = x[0].len();
        if n_features == 0 || x.iter().any(|row| row.len() != n_features) {
            return Err(ScoringError::Training("rows must share a non-zero width".to_string()));
        }

        let max_samples = config.max_samples.min(x.len());
        let height_limit = (max_samples as f64).log2().ceil().max(1.0) as usize;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let all_rows: Vec<usize> = (0..x.len()).collect();

        let trees = (0..config.n_estimators)
            .map(|_| {
                let mut tree_rng = StdRng::seed_from_u64(rng.gen());
                let rows: Vec<usize> = all_rows
                    .choose_multiple(&mut tree_rng, max_samples)
                    .copied()
                    .collect();
                IsolationTree::grow(x, &rows, height_limit, &mut tree_rng)
            })
            .collect();

        let mut forest = Self {
            trees,
            max_samples,
            n_features,
            offset: -0.5,
            contamination: config.contamination,
        };

        let scores: Vec<f64> = x.iter().map(|row| forest.score_samples(row)).collect();
        forest.offset = percentile(&scores, 100.0 * config.contamination);
        Ok(forest)
    }

    /// Raw anomaly score in [-1, 0); more negative is more anomalous
    pub fn score_samples(&self, sample: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return -0.5;
        }
        let mean_path: f64 =
            self.trees.iter().map(|t| t.path_length(sample)).sum::<f64>() / self.trees.len() as f64;
        let norm = average_path_length(self.max_samples).max(f64::MIN_POSITIVE);
        -(2f64.powf(-mean_path / norm))
    }

    /// Score minus the fitted offset; negative values are anomalous
    pub fn decision_function(&self, sample: &[f64]) -> f64 {
        self.score_samples(sample) - self.offset
    }

    pub fn predict(&self, sample: &[f64]) -> (Decision, f64) {
        let score = self.score_samples(sample);
        let decision = if score - self.offset < 0.0 { Decision::Anomalous } else { Decision::Normal };
        (decision, score)
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn contamination(&self) -> f64 {
        self.contamination
    }
}

/// Linear-interpolation percentile, `q` in [0, 100]
fn percentile(values: &[f64], q: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (q / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}
