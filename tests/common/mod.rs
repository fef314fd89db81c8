//! Shared fixtures: one default training run per test binary

#![allow(dead_code)]

use once_cell::sync::Lazy;
use std::sync::Arc;
use threat_scoring::scoring::{train_all, ScoringConfig, ThreatScoringService, TrainingSummary};

pub static TRAINED: Lazy<TrainingSummary> =
    Lazy::new(|| train_all(&ScoringConfig::default()).expect("default training run"));

/// Service with both detectors ready
pub fn ready_service() -> Arc<ThreatScoringService> {
    Arc::new(ThreatScoringService::from_detectors(
        TRAINED.phishing.detector.clone(),
        TRAINED.anomaly.detector.clone(),
    ))
}

pub const PHISHING_TEXT: &str = "URGENT: Your account has been suspended. Click here to verify your identity immediately!";
pub const LEGITIMATE_TEXT: &str = "Meeting reminder: standup at 10 AM";
