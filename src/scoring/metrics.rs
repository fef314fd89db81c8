//! Stratified hold-out split and per-class quality report

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::{Result, ScoringError};

/// Row indices of a train/test split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Stratified split keeping class proportions on both sides.
///
/// Fails when either side would hold a single class.
pub fn stratified_split(labels: &[u8], test_size: f64, seed: u64) -> Result<Split> {
    let n = labels.len();
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(ScoringError::InvalidInput(format!("test_size {} not in (0, 1)", test_size)));
    }
    let n_test = (test_size * n as f64).ceil() as usize;

    let mut classes: Vec<u8> = labels.to_vec();
    classes.sort_unstable();
    classes.dedup();

    // floor of proportional allocation, remainder to the largest fractional parts
    let mut allocation: Vec<(u8, Vec<usize>, usize, f64)> = classes
        .iter()
        .map(|&c| {
            let rows: Vec<usize> = (0..n).filter(|&i| labels[i] == c).collect();
            let exact = rows.len() as f64 * n_test as f64 / n as f64;
            (c, rows, exact.floor() as usize, exact - exact.floor())
        })
        .collect();
    let assigned: usize = allocation.iter().map(|a| a.2).sum();
    let mut order: Vec<usize> = (0..allocation.len()).collect();
    order.sort_by(|&a, &b| allocation[b].3.total_cmp(&allocation[a].3).then(a.cmp(&b)));
    for &i in order.iter().take(n_test.saturating_sub(assigned)) {
        allocation[i].2 += 1;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut split = Split { train: Vec::new(), test: Vec::new() };
    for (_, mut rows, take, _) in allocation {
        rows.shuffle(&mut rng);
        split.test.extend_from_slice(&rows[..take.min(rows.len())]);
        split.train.extend_from_slice(&rows[take.min(rows.len())..]);
    }
    split.train.sort_unstable();
    split.test.sort_unstable();

    for (side, rows) in [("train", &split.train), ("test", &split.test)] {
        let first = rows.first().map(|&r| labels[r]);
        if rows.iter().all(|&r| Some(labels[r]) == first) {
            return Err(ScoringError::Training(format!("{} split holds a single class", side)));
        }
    }
    Ok(split)
}

/// Precision/recall/F1 for one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub name: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Binary classification report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_precision: f64,
    pub macro_recall: f64,
    pub macro_f1: f64,
}

impl ClassificationReport {
    /// Build from true and predicted labels. `names[i]` names class `i`.
    pub fn new(y_true: &[u8], y_pred: &[u8], names: &[&str]) -> Self {
        let classes: Vec<ClassMetrics> = names
            .iter()
            .enumerate()
            .map(|(c, name)| {
                let c = c as u8;
                let tp = y_true.iter().zip(y_pred).filter(|&(&t, &p)| t == c && p == c).count() as f64;
                let fp = y_true.iter().zip(y_pred).filter(|&(&t, &p)| t != c && p == c).count() as f64;
                let support = y_true.iter().filter(|&&t| t == c).count();
                let precision = ratio(tp, tp + fp);
                let recall = ratio(tp, support as f64);
                let f1 = ratio(2.0 * precision * recall, precision + recall);
                ClassMetrics { name: name.to_string(), precision, recall, f1, support }
            })
            .collect();

        let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count() as f64;
        let k = classes.len().max(1) as f64;
        Self {
            accuracy: ratio(correct, y_true.len() as f64),
            macro_precision: classes.iter().map(|c| c.precision).sum::<f64>() / k,
            macro_recall: classes.iter().map(|c| c.recall).sum::<f64>() / k,
            macro_f1: classes.iter().map(|c| c.f1).sum::<f64>() / k,
            classes,
        }
    }

    pub fn class(&self, name: &str) -> Option<&ClassMetrics> {
        self.classes.iter().find(|c| c.name == name)
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>12} {:>10} {:>10} {:>10} {:>10}", "", "precision", "recall", "f1-score", "support")?;
        for c in &self.classes {
            writeln!(f, "{:>12} {:>10.2} {:>10.2} {:>10.2} {:>10}", c.name, c.precision, c.recall, c.f1, c.support)?;
        }
        let support: usize = self.classes.iter().map(|c| c.support).sum();
        writeln!(f, "{:>12} {:>10} {:>10} {:>10.2} {:>10}", "accuracy", "", "", self.accuracy, support)?;
        write!(
            f,
            "{:>12} {:>10.2} {:>10.2} {:>10.2} {:>10}",
            "macro avg", self.macro_precision, self.macro_recall, self.macro_f1, support
        )
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}
