//! Health check handler

use axum::{extract::State, response::Json};
use std::sync::Arc;

use crate::api::server::ScoringServer;
use crate::api::types::{HealthResponse, ModelsHealth};

pub const SERVICE_NAME: &str = "ml-service";

/// Service name, overall status and per-model loaded flags
pub async fn health_check(State(state): State<Arc<ScoringServer>>) -> Json<HealthResponse> {
    let health = state.service.health();
    let status = if health.phishing_model_loaded && health.anomaly_model_loaded {
        "operational"
    } else {
        "degraded"
    };
    Json(HealthResponse {
        service: SERVICE_NAME.to_string(),
        status: status.to_string(),
        models: ModelsHealth {
            phishing_detector: health.phishing_model_loaded,
            anomaly_detector: health.anomaly_model_loaded,
        },
    })
}
