//! Scoring configuration
//!
//! Training hyperparameters, artifact location and server settings. Loaded from a
//! JSON file, then overridden from the environment.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::errors::{Result, ScoringError};

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScoringConfig {
    /// Artifact storage
    pub storage: StorageConfig,

    /// Synthetic dataset generation
    pub dataset: DatasetConfig,

    /// TF-IDF vectorizer
    pub text: TextConfig,

    /// Phishing random forest
    pub classifier: ClassifierConfig,

    /// Login isolation forest
    pub anomaly: AnomalyModelConfig,

    /// HTTP adapter
    pub server: ServerConfig,
}

/// Artifact storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the four artifact files
    pub models_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("./models"),
        }
    }
}

/// Dataset generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Seed for the login populations
    pub seed: u64,
    /// Normal login rows
    pub normal_samples: usize,
    /// Anomalous login rows
    pub anomaly_samples: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            normal_samples: 500,
            anomaly_samples: 50,
        }
    }
}

/// Text vectorizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Vocabulary bound
    pub max_features: usize,
    /// Minimum document count for a term
    pub min_df: usize,
    /// Maximum document frequency as a fraction of the corpus
    pub max_df: f64,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            max_features: 5000,
            min_df: 1,
            max_df: 0.95,
        }
    }
}

/// Random forest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub n_estimators: usize,
    pub max_depth: usize,
    pub seed: u64,
    /// Held-out fraction for the quality report
    pub test_size: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 20,
            seed: 42,
            test_size: 0.2,
        }
    }
}

/// Isolation forest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyModelConfig {
    pub n_estimators: usize,
    /// Upper bound on rows per tree
    pub max_samples: usize,
    /// Expected anomaly share, places the decision offset
    pub contamination: f64,
    pub seed: u64,
}

impl Default for AnomalyModelConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_samples: 256,
            contamination: 0.1,
            seed: 42,
        }
    }
}

/// HTTP adapter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `*` or a comma-separated origin list
    pub cors_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origin: "*".to_string(),
        }
    }
}

impl ScoringConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Defaults, then `THREAT_CONFIG` file if set, then individual env overrides
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("THREAT_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Apply `THREAT_*` environment overrides in place
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(dir) = std::env::var("THREAT_MODELS_DIR") {
            self.storage.models_dir = PathBuf::from(dir);
        }
        if let Ok(seed) = std::env::var("THREAT_SEED") {
            let seed: u64 = seed
                .trim()
                .parse()
                .map_err(|_| ScoringError::Configuration(format!("THREAT_SEED is not a u64: {}", seed)))?;
            self.dataset.seed = seed;
            self.classifier.seed = seed;
            self.anomaly.seed = seed;
        }
        if let Ok(host) = std::env::var("THREAT_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("THREAT_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ScoringError::Configuration(format!("THREAT_PORT is not a port: {}", port)))?;
        }
        if let Ok(origin) = std::env::var("THREAT_CORS_ORIGIN") {
            self.server.cors_origin = origin;
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let total = self.dataset.normal_samples + self.dataset.anomaly_samples;
        if self.dataset.normal_samples == 0 || self.dataset.anomaly_samples == 0 {
            return Err(ScoringError::Configuration(
                "Both login populations must be non-empty".to_string(),
            ));
        }
        if self.dataset.anomaly_samples as f64 > 0.2 * total as f64 {
            return Err(ScoringError::Configuration(format!(
                "Anomalous rows must stay at or below 20% of the table ({} of {})",
                self.dataset.anomaly_samples, total
            )));
        }
        if self.text.max_features == 0 {
            return Err(ScoringError::Configuration("max_features must be greater than 0".to_string()));
        }
        if !(self.text.max_df > 0.0 && self.text.max_df <= 1.0) {
            return Err(ScoringError::Configuration("max_df must be in (0, 1]".to_string()));
        }
        if self.classifier.n_estimators == 0 || self.anomaly.n_estimators == 0 {
            return Err(ScoringError::Configuration("Forests need at least one tree".to_string()));
        }
        if self.classifier.max_depth == 0 {
            return Err(ScoringError::Configuration("max_depth must be greater than 0".to_string()));
        }
        if !(self.classifier.test_size > 0.0 && self.classifier.test_size < 1.0) {
            return Err(ScoringError::Configuration("test_size must be in (0, 1)".to_string()));
        }
        if !(self.anomaly.contamination > 0.0 && self.anomaly.contamination <= 0.5) {
            return Err(ScoringError::Configuration("contamination must be in (0, 0.5]".to_string()));
        }
        if self.anomaly.max_samples < 2 {
            return Err(ScoringError::Configuration("max_samples must be at least 2".to_string()));
        }
        Ok(())
    }
}
