//! Scoring service
//!
//! Owns the two detectors behind an explicit handle. Each model moves once from
//! uninitialized to ready or failed; after that the state is read-only and shared
//! across request handlers without locking.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use super::detector::{AnomalyDetector, AnomalyPrediction, PhishingDetector, PhishingPrediction};
use super::errors::{Result, ScoringError};
use super::features::LoginEvent;
use super::storage::{ArtifactCodec, ModelStore};

/// Lifecycle state of one model after loading was attempted
#[derive(Debug)]
enum ModelState<T> {
    Ready(Arc<T>),
    Failed(String),
}

/// Observable lifecycle of one model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    Uninitialized,
    Ready,
    Failed,
}

/// Per-model loaded flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub phishing_model_loaded: bool,
    pub anomaly_model_loaded: bool,
}

/// Phishing and login-anomaly scoring behind one handle
#[derive(Debug, Default)]
pub struct ThreatScoringService {
    phishing: OnceCell<ModelState<PhishingDetector>>,
    anomaly: OnceCell<ModelState<AnomalyDetector>>,
}

impl ThreatScoringService {
    /// Service with both models uninitialized
    pub fn new() -> Self {
        Self::default()
    }

    /// Service with both models ready
    pub fn from_detectors(phishing: PhishingDetector, anomaly: AnomalyDetector) -> Self {
        let service = Self::new();
        let _ = service.phishing.set(ModelState::Ready(Arc::new(phishing)));
        let _ = service.anomaly.set(ModelState::Ready(Arc::new(anomaly)));
        service
    }

    /// Open a store and load both models
    pub fn from_store<C: ArtifactCodec>(store: &ModelStore<C>) -> Self {
        let service = Self::new();
        service.load(store);
        service
    }

    /// Load both models from the store. Only the first call has an effect;
    /// a model whose artifacts are missing or unreadable is marked failed.
    pub fn load<C: ArtifactCodec>(&self, store: &ModelStore<C>) -> HealthStatus {
        self.phishing.get_or_init(|| {
            settle("phishing", PhishingDetector::load(store), store)
        });
        self.anomaly.get_or_init(|| {
            settle("anomaly", AnomalyDetector::load(store), store)
        });
        let health = self.health();
        info!(
            "📦 Models loaded from {}: phishing={} anomaly={}",
            store.root().display(),
            health.phishing_model_loaded,
            health.anomaly_model_loaded
        );
        health
    }

    pub fn predict_phishing(&self, text: &str) -> Result<PhishingPrediction> {
        if text.is_empty() {
            return Err(ScoringError::InvalidInput("text must not be empty".to_string()));
        }
        Ok(self.phishing_detector()?.predict(text))
    }

    pub fn predict_anomaly(&self, event: &LoginEvent) -> Result<AnomalyPrediction> {
        Ok(self.anomaly_detector()?.predict(event))
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            phishing_model_loaded: self.phishing_status() == ModelStatus::Ready,
            anomaly_model_loaded: self.anomaly_status() == ModelStatus::Ready,
        }
    }

    pub fn phishing_status(&self) -> ModelStatus {
        status(&self.phishing)
    }

    pub fn anomaly_status(&self) -> ModelStatus {
        status(&self.anomaly)
    }

    pub fn phishing_detector(&self) -> Result<Arc<PhishingDetector>> {
        ready(&self.phishing, "phishing")
    }

    pub fn anomaly_detector(&self) -> Result<Arc<AnomalyDetector>> {
        ready(&self.anomaly, "anomaly")
    }
}

fn settle<T, C: ArtifactCodec>(model: &str, loaded: Result<Option<T>>, store: &ModelStore<C>) -> ModelState<T> {
    match loaded {
        Ok(Some(detector)) => ModelState::Ready(Arc::new(detector)),
        Ok(None) => {
            warn!("⚠️ {} model artifacts not found in {}", model, store.root().display());
            ModelState::Failed("artifacts not found".to_string())
        }
        Err(e) => {
            warn!("⚠️ Failed to load {} model: {}", model, e);
            ModelState::Failed(e.to_string())
        }
    }
}

fn status<T>(cell: &OnceCell<ModelState<T>>) -> ModelStatus {
    match cell.get() {
        None => ModelStatus::Uninitialized,
        Some(ModelState::Ready(_)) => ModelStatus::Ready,
        Some(ModelState::Failed(_)) => ModelStatus::Failed,
    }
}

fn ready<T>(cell: &OnceCell<ModelState<T>>, model: &str) -> Result<Arc<T>> {
    match cell.get() {
        Some(ModelState::Ready(detector)) => Ok(Arc::clone(detector)),
        Some(ModelState::Failed(reason)) => {
            Err(ScoringError::ModelNotLoaded(format!("{} model failed to load: {}", model, reason)))
        }
        None => Err(ScoringError::ModelNotLoaded(format!("{} model not initialized", model))),
    }
}
