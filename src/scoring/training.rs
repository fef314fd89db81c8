//! Offline training runs
//!
//! One-shot and single-threaded: generate or accept the datasets, fit both
//! detectors, evaluate, and optionally persist the four artifacts.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use super::config::ScoringConfig;
use super::dataset::{self, LoginTable, PhishingCorpus};
use super::detector::{AnomalyDetector, PhishingDetector};
use super::errors::Result;
use super::features::FeatureVector;
use super::forest::RandomForestClassifier;
use super::isolation::{Decision, IsolationForest};
use super::metrics::{stratified_split, ClassificationReport};
use super::storage::{ArtifactCodec, ArtifactKind, ModelStore};
use super::text::TfIdfVectorizer;

const CLASS_NAMES: [&str; 2] = ["Legitimate", "Phishing"];

/// Fitted phishing detector with its held-out evaluation
#[derive(Debug, Clone)]
pub struct PhishingTraining {
    pub detector: PhishingDetector,
    pub report: ClassificationReport,
}

/// Anomaly detection counts over the training table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyEvaluation {
    pub rows: usize,
    pub flagged: usize,
    /// Generated anomalies that were flagged
    pub anomalies_caught: usize,
    pub anomalies_total: usize,
}

impl AnomalyEvaluation {
    pub fn recall(&self) -> f64 {
        if self.anomalies_total == 0 {
            0.0
        } else {
            self.anomalies_caught as f64 / self.anomalies_total as f64
        }
    }
}

/// Fitted anomaly detector with its training-set evaluation
#[derive(Debug, Clone)]
pub struct AnomalyTraining {
    pub detector: AnomalyDetector,
    pub evaluation: AnomalyEvaluation,
}

/// Outcome of a full training run
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub phishing: PhishingTraining,
    pub anomaly: AnomalyTraining,
    /// Written artifact paths, empty when nothing was persisted
    pub artifacts: Vec<PathBuf>,
}

/// Fit the vectorizer on the whole corpus, the forest on the stratified training
/// split, and report on the held-out split.
pub fn train_phishing(corpus: &PhishingCorpus, config: &ScoringConfig) -> Result<PhishingTraining> {
    let started = Instant::now();
    let texts = corpus.texts();
    let labels = corpus.labels();

    let vectorizer = TfIdfVectorizer::fit(&texts, &config.text)?;
    let x = vectorizer.transform_all(&texts);
    info!("📝 Vocabulary: {} terms from {} documents", vectorizer.vocabulary_size(), corpus.len());

    let split = stratified_split(&labels, config.classifier.test_size, config.classifier.seed)?;
    let (x_train, y_train) = select(&x, &labels, &split.train);
    let (x_test, y_test) = select(&x, &labels, &split.test);

    let classifier = RandomForestClassifier::fit(&x_train, &y_train, &config.classifier)?;
    let y_pred: Vec<u8> = x_test.iter().map(|row| classifier.predict(row)).collect();
    let report = ClassificationReport::new(&y_test, &y_pred, &CLASS_NAMES);

    info!(
        "🎣 Phishing classifier trained in {:?} ({} train / {} test)\n{}",
        started.elapsed(),
        x_train.len(),
        x_test.len(),
        report
    );

    Ok(PhishingTraining {
        detector: PhishingDetector::new(vectorizer, classifier)?,
        report,
    })
}

/// Fit the isolation forest on the unlabeled table, then count what it flags
pub fn train_anomaly(table: &LoginTable, config: &ScoringConfig) -> Result<AnomalyTraining> {
    let started = Instant::now();
    let model = IsolationForest::fit(&table.rows, &config.anomaly)?;

    let flags: Vec<bool> = table
        .rows
        .iter()
        .map(|row| model.predict(row).0 == Decision::Anomalous)
        .collect();
    let evaluation = AnomalyEvaluation {
        rows: table.len(),
        flagged: flags.iter().filter(|&&f| f).count(),
        anomalies_caught: flags
            .iter()
            .zip(&table.ground_truth)
            .filter(|&(&flagged, &truth)| flagged && truth)
            .count(),
        anomalies_total: table.anomaly_count(),
    };

    info!(
        "🔍 Anomaly model trained in {:?}: flagged {}/{} rows, caught {}/{} generated anomalies",
        started.elapsed(),
        evaluation.flagged,
        evaluation.rows,
        evaluation.anomalies_caught,
        evaluation.anomalies_total
    );

    Ok(AnomalyTraining {
        detector: AnomalyDetector::new(model, table.schema.clone())?,
        evaluation,
    })
}

/// Generate both datasets from `config` and train both detectors
pub fn train_all(config: &ScoringConfig) -> Result<TrainingSummary> {
    config.validate()?;
    let corpus = dataset::phishing_corpus();
    let table = dataset::login_table(&config.dataset)?;
    Ok(TrainingSummary {
        phishing: train_phishing(&corpus, config)?,
        anomaly: train_anomaly(&table, config)?,
        artifacts: Vec::new(),
    })
}

/// Train both detectors and write all four artifacts to `store`
pub fn train_and_persist<C: ArtifactCodec>(config: &ScoringConfig, store: &ModelStore<C>) -> Result<TrainingSummary> {
    let mut summary = train_all(config)?;
    summary.phishing.detector.save(store)?;
    summary.anomaly.detector.save(store)?;
    summary.artifacts = ArtifactKind::ALL.iter().map(|&kind| store.path_for(kind)).collect();
    info!("✅ Training complete, artifacts in {}", store.root().display());
    Ok(summary)
}

fn select(x: &[FeatureVector], y: &[u8], rows: &[usize]) -> (Vec<FeatureVector>, Vec<u8>) {
    rows.iter().map(|&i| (x[i].clone(), y[i])).unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_train_phishing_reports_both_classes() {
        let trained = train_phishing(&dataset::phishing_corpus(), &ScoringConfig::default()).unwrap();
        assert_eq!(trained.report.classes.len(), 2);
        let support: usize = trained.report.classes.iter().map(|c| c.support).sum();
        assert_eq!(support, 16);
        assert!(trained.report.accuracy > 0.5);
    }

    #[test]
    fn test_train_anomaly_flags_roughly_contamination() {
        let config = ScoringConfig::default();
        let table = dataset::login_table(&config.dataset).unwrap();
        let trained = train_anomaly(&table, &config).unwrap();
        assert_eq!(trained.evaluation.rows, 550);
        assert!(trained.evaluation.flagged >= 50 && trained.evaluation.flagged <= 60);
        // The 50 generated anomalies form one dense cluster, so each 256-row
        // subsample holds ~23 of them and they partly mask each other. Flagging
        // 55 rows at random would catch ~5; the fitted model catches about 29.
        assert!(trained.evaluation.recall() >= 0.5, "{:?}", trained.evaluation);
    }

    #[test]
    fn test_generated_anomalies_score_below_normal_logins() {
        let config = ScoringConfig::default();
        let table = dataset::login_table(&config.dataset).unwrap();
        let trained = train_anomaly(&table, &config).unwrap();
        let model = trained.detector.model();
        let scores: Vec<f64> = table.rows.iter().map(|row| model.score_samples(row)).collect();

        let mean = |anomalous: bool| {
            let picked: Vec<f64> = scores
                .iter()
                .zip(&table.ground_truth)
                .filter(|&(_, &truth)| truth == anomalous)
                .map(|(&s, _)| s)
                .collect();
            picked.iter().sum::<f64>() / picked.len() as f64
        };
        assert!(mean(true) < mean(false));
    }

    #[test]
    fn test_invalid_config_stops_training() {
        let mut config = ScoringConfig::default();
        config.classifier.test_size = 1.5;
        assert!(train_all(&config).is_err());
    }
}
