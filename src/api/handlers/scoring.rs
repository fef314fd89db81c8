//! Phishing and login-anomaly scoring handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use super::round4;
use crate::api::server::ScoringServer;
use crate::api::types::*;
use crate::api::validators::{json_body, scoring_error, validate_login, validate_text};
use crate::scoring::LoginEvent;

pub async fn predict_phishing(
    State(state): State<Arc<ScoringServer>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, (StatusCode, Json<ErrorResponse>)> {
    let payload = json_body(payload)?;
    validate_text("text", &payload.text)?;

    let started = Instant::now();
    let prediction = state.service.predict_phishing(&payload.text).map_err(|e| scoring_error(&e))?;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    debug!("/predict scored {} chars in {:.2}ms", payload.text.len(), elapsed_ms);

    Ok(Json(PredictResponse {
        risk_score: prediction.risk_score,
        label: prediction.label,
        confidence: round4(prediction.confidence),
        probabilities: Probabilities {
            legitimate: round4(prediction.probability_legitimate),
            phishing: round4(prediction.probability_phishing),
        },
        processing_time_ms: (elapsed_ms * 100.0).round() / 100.0,
    }))
}

pub async fn detect_anomaly(
    State(state): State<Arc<ScoringServer>>,
    payload: Result<Json<AnomalyRequest>, JsonRejection>,
) -> Result<Json<AnomalyResponse>, (StatusCode, Json<ErrorResponse>)> {
    let payload = json_body(payload)?;
    validate_login(&payload)?;

    let event = LoginEvent::from(&payload);
    let prediction = state.service.predict_anomaly(&event).map_err(|e| scoring_error(&e))?;

    Ok(Json(AnomalyResponse {
        is_anomaly: prediction.is_anomaly,
        risk_score: prediction.risk_score,
        anomaly_score: round4(prediction.anomaly_score),
        label: prediction.label,
        features_analyzed: prediction.features_analyzed,
    }))
}
