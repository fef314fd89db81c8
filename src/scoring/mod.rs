//! Threat scoring core
//!
//! Two detectors feed one integer risk scale:
//! - phishing text: TF-IDF features into a random forest
//! - login events: a fixed feature schema into an isolation forest
//!
//! Training is offline and deterministic for a fixed seed. Inference runs against
//! immutable artifacts loaded once through [`ThreatScoringService`].

pub mod config;
pub mod dataset;
pub mod detector;
pub mod errors;
pub mod features;
pub mod forest;
pub mod isolation;
pub mod metrics;
pub mod normalizer;
pub mod service;
pub mod storage;
pub mod text;
pub mod training;

pub use config::ScoringConfig;
pub use detector::{AnomalyDetector, AnomalyLabel, AnomalyPrediction, PhishingDetector, PhishingLabel, PhishingPrediction};
pub use errors::{Result, ScoringError};
pub use features::{FeatureSchema, LoginEvent, LoginFeature};
pub use normalizer::{anomaly_risk, phishing_risk};
pub use service::{HealthStatus, ModelStatus, ThreatScoringService};
pub use storage::{ArtifactCodec, ArtifactKind, BincodeCodec, JsonCodec, ModelStore};
pub use training::{train_all, train_and_persist, TrainingSummary};
