use serde::{Deserialize, Serialize};

use crate::scoring::{AnomalyLabel, LoginEvent, PhishingLabel};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PredictRequest {
    pub text: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Probabilities {
    pub legitimate: f64,
    pub phishing: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PredictResponse {
    pub risk_score: u8,
    pub label: PhishingLabel,
    pub confidence: f64,
    pub probabilities: Probabilities,
    pub processing_time_ms: f64,
}

fn default_failed_attempts() -> u32 {
    0
}

fn default_session_duration() -> f64 {
    30.0
}

/// Login event as accepted over HTTP. The first three fields are required.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AnomalyRequest {
    pub login_hour: f64,
    pub ip_frequency: f64,
    pub device_change: u8,
    #[serde(default = "default_failed_attempts")]
    pub failed_attempts: u32,
    #[serde(default = "default_session_duration")]
    pub session_duration: f64,
}

impl From<&AnomalyRequest> for LoginEvent {
    fn from(req: &AnomalyRequest) -> Self {
        LoginEvent::new(
            req.login_hour,
            req.ip_frequency,
            f64::from(req.device_change),
            f64::from(req.failed_attempts),
            req.session_duration,
        )
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AnomalyResponse {
    pub is_anomaly: bool,
    pub risk_score: u8,
    pub anomaly_score: f64,
    pub label: AnomalyLabel,
    pub features_analyzed: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ChatResponse {
    pub response: String,
    pub persona: String,
    pub classification: String,
    pub timestamp: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ModelsHealth {
    pub phishing_detector: bool,
    pub anomaly_detector: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HealthResponse {
    pub service: String,
    pub status: String,
    pub models: ModelsHealth,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
