//! Trained detectors and their prediction records
//!
//! A detector pairs a model with the artifact it cannot be used without: the
//! classifier with its vectorizer, the isolation forest with its feature schema.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::dataset::PHISHING;
use super::errors::{Result, ScoringError};
use super::features::{FeatureSchema, LoginEvent};
use super::forest::RandomForestClassifier;
use super::isolation::{Decision, IsolationForest};
use super::normalizer::{anomaly_risk, phishing_risk};
use super::storage::{ArtifactCodec, ArtifactKind, ModelStore};
use super::text::TfIdfVectorizer;

/// Phishing classifier output label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhishingLabel {
    Legitimate,
    Phishing,
}

impl fmt::Display for PhishingLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhishingLabel::Legitimate => f.write_str("Legitimate"),
            PhishingLabel::Phishing => f.write_str("Phishing"),
        }
    }
}

/// Anomaly scorer output label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnomalyLabel {
    Normal,
    Anomalous,
}

impl fmt::Display for AnomalyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnomalyLabel::Normal => f.write_str("Normal"),
            AnomalyLabel::Anomalous => f.write_str("Anomalous"),
        }
    }
}

/// Result of scoring one text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhishingPrediction {
    pub label: PhishingLabel,
    pub confidence: f64,
    pub probability_legitimate: f64,
    pub probability_phishing: f64,
    pub risk_score: u8,
}

/// Result of scoring one login event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyPrediction {
    pub is_anomaly: bool,
    pub risk_score: u8,
    pub anomaly_score: f64,
    pub label: AnomalyLabel,
    pub features_analyzed: Vec<String>,
}

/// TF-IDF vectorizer plus random forest
#[derive(Debug, Clone)]
pub struct PhishingDetector {
    vectorizer: TfIdfVectorizer,
    classifier: RandomForestClassifier,
}

impl PhishingDetector {
    pub fn new(vectorizer: TfIdfVectorizer, classifier: RandomForestClassifier) -> Result<Self> {
        if vectorizer.vocabulary_size() != classifier.n_features() {
            return Err(ScoringError::FeatureSchemaMismatch(format!(
                "vectorizer has {} terms, classifier expects {}",
                vectorizer.vocabulary_size(),
                classifier.n_features()
            )));
        }
        Ok(Self { vectorizer, classifier })
    }

    pub fn predict(&self, text: &str) -> PhishingPrediction {
        let vector = self.vectorizer.transform(text);
        let [p_legitimate, p_phishing] = self.classifier.predict_proba(&vector);
        let label = if self.classifier.predict(&vector) == PHISHING {
            PhishingLabel::Phishing
        } else {
            PhishingLabel::Legitimate
        };
        debug!("Phishing prediction: {} (p={:.4})", label, p_phishing);
        PhishingPrediction {
            label,
            confidence: p_legitimate.max(p_phishing),
            probability_legitimate: p_legitimate,
            probability_phishing: p_phishing,
            risk_score: phishing_risk(p_phishing),
        }
    }

    pub fn vectorizer(&self) -> &TfIdfVectorizer {
        &self.vectorizer
    }

    pub fn classifier(&self) -> &RandomForestClassifier {
        &self.classifier
    }

    pub fn save<C: ArtifactCodec>(&self, store: &ModelStore<C>) -> Result<()> {
        store.save(ArtifactKind::PhishingClassifier, &self.classifier)?;
        store.save(ArtifactKind::TextVectorizer, &self.vectorizer)?;
        Ok(())
    }

    /// `Ok(None)` when either file is missing
    pub fn load<C: ArtifactCodec>(store: &ModelStore<C>) -> Result<Option<Self>> {
        let classifier = store.load::<RandomForestClassifier>(ArtifactKind::PhishingClassifier)?;
        let vectorizer = store.load::<TfIdfVectorizer>(ArtifactKind::TextVectorizer)?;
        match (classifier, vectorizer) {
            (Some(classifier), Some(vectorizer)) => Self::new(vectorizer, classifier).map(Some),
            _ => Ok(None),
        }
    }
}

/// Isolation forest plus the schema it was trained on
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyDetector {
    model: IsolationForest,
    schema: FeatureSchema,
}

impl AnomalyDetector {
    pub fn new(model: IsolationForest, schema: FeatureSchema) -> Result<Self> {
        if schema.len() != model.n_features() {
            return Err(ScoringError::FeatureSchemaMismatch(format!(
                "schema lists {} features, model expects {}",
                schema.len(),
                model.n_features()
            )));
        }
        Ok(Self { model, schema })
    }

    pub fn predict(&self, event: &LoginEvent) -> AnomalyPrediction {
        let vector = event.build_vector(&self.schema);
        let (decision, score) = self.model.predict(&vector);
        let is_anomaly = decision == Decision::Anomalous;
        debug!("Anomaly prediction: anomalous={} score={:.4}", is_anomaly, score);
        AnomalyPrediction {
            is_anomaly,
            risk_score: anomaly_risk(score),
            anomaly_score: score,
            label: if is_anomaly { AnomalyLabel::Anomalous } else { AnomalyLabel::Normal },
            features_analyzed: self.schema.names().to_vec(),
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn model(&self) -> &IsolationForest {
        &self.model
    }

    pub fn save<C: ArtifactCodec>(&self, store: &ModelStore<C>) -> Result<()> {
        store.save(ArtifactKind::AnomalyModel, &self.model)?;
        store.save(ArtifactKind::FeatureSchema, &self.schema)?;
        Ok(())
    }

    /// `Ok(None)` when the model file is missing. A model without a readable
    /// schema is a `FeatureSchemaMismatch`.
    pub fn load<C: ArtifactCodec>(store: &ModelStore<C>) -> Result<Option<Self>> {
        let model = match store.load::<IsolationForest>(ArtifactKind::AnomalyModel)? {
            Some(model) => model,
            None => return Ok(None),
        };
        let schema = match store.load::<FeatureSchema>(ArtifactKind::FeatureSchema) {
            Ok(Some(schema)) => schema,
            Ok(None) => {
                return Err(ScoringError::FeatureSchemaMismatch(
                    "anomaly model present but feature schema file is missing".to_string(),
                ))
            }
            Err(e) => return Err(ScoringError::FeatureSchemaMismatch(format!("unreadable feature schema: {}", e))),
        };
        Self::new(model, schema).map(Some)
    }
}
