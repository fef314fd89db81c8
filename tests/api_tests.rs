//! HTTP adapter tests: routes, status codes, defaults and response shapes

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::{ready_service, LEGITIMATE_TEXT, PHISHING_TEXT};
use serde_json::{json, Value};
use std::sync::Arc;
use threat_scoring::api::server::ScoringServer;
use threat_scoring::api::types::{AnomalyResponse, HealthResponse, PredictResponse};
use threat_scoring::scoring::config::ServerConfig;
use threat_scoring::scoring::{AnomalyLabel, PhishingLabel, ThreatScoringService};

fn create_test_server(service: Arc<ThreatScoringService>) -> TestServer {
    let server = ScoringServer::new(service, ServerConfig::default());
    TestServer::new(server.create_router().unwrap()).unwrap()
}

fn decimals(value: f64) -> usize {
    let text = value.to_string();
    text.split('.').nth(1).map(|d| d.len()).unwrap_or(0)
}

#[tokio::test]
async fn test_health_reports_loaded_models() {
    let server = create_test_server(ready_service());
    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: HealthResponse = response.json();
    assert_eq!(body.service, "ml-service");
    assert_eq!(body.status, "operational");
    assert!(body.models.phishing_detector && body.models.anomaly_detector);
}

#[tokio::test]
async fn test_health_without_models() {
    let server = create_test_server(Arc::new(ThreatScoringService::new()));
    let body: HealthResponse = server.get("/health").await.json();
    assert_eq!(body.status, "degraded");
    assert!(!body.models.phishing_detector);
    assert!(!body.models.anomaly_detector);
}

#[tokio::test]
async fn test_predict_phishing() {
    let server = create_test_server(ready_service());
    let response = server.post("/predict").json(&json!({ "text": PHISHING_TEXT })).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: PredictResponse = response.json();
    assert_eq!(body.label, PhishingLabel::Phishing);
    assert!(body.risk_score >= 50);
    assert!(decimals(body.confidence) <= 4);
    assert!(decimals(body.probabilities.phishing) <= 4);
    assert!(body.processing_time_ms >= 0.0);

    let raw: Value = server.post("/predict").json(&json!({ "text": LEGITIMATE_TEXT })).await.json();
    assert_eq!(raw["label"], "Legitimate");
    assert!(raw["probabilities"]["legitimate"].is_number());
}

#[tokio::test]
async fn test_predict_rejects_empty_text() {
    let server = create_test_server(ready_service());
    let response = server.post("/predict").json(&json!({ "text": "" })).await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");

    let response = server.post("/predict").json(&json!({ "text": "   " })).await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_body_rejections_use_error_shape() {
    let server = create_test_server(ready_service());

    let response = server.post("/predict").json(&json!({})).await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
    assert!(body["error"].as_str().unwrap().contains("text"));

    let response = server.post("/anomaly").json(&json!({ "login_hour": 5, "device_change": 0 })).await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");

    let response = server
        .post("/chat")
        .content_type("application/json")
        .bytes("{\"message\": ".into())
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_anomaly_scenarios() {
    let server = create_test_server(ready_service());
    let response = server
        .post("/anomaly")
        .json(&json!({
            "login_hour": 3, "ip_frequency": 2, "device_change": 1,
            "failed_attempts": 7, "session_duration": 2
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: AnomalyResponse = response.json();
    assert!(body.is_anomaly);
    assert_eq!(body.label, AnomalyLabel::Anomalous);
    assert!(body.risk_score >= 50);
    assert!(decimals(body.anomaly_score) <= 4);
    assert_eq!(body.features_analyzed.len(), 5);

    let body: AnomalyResponse = server
        .post("/anomaly")
        .json(&json!({ "login_hour": 10, "ip_frequency": 55, "device_change": 0 }))
        .await
        .json();
    assert!(!body.is_anomaly);
}

#[tokio::test]
async fn test_anomaly_defaults_match_explicit_values() {
    let server = create_test_server(ready_service());
    let defaulted: AnomalyResponse = server
        .post("/anomaly")
        .json(&json!({ "login_hour": 9, "ip_frequency": 40, "device_change": 0 }))
        .await
        .json();
    let explicit: AnomalyResponse = server
        .post("/anomaly")
        .json(&json!({
            "login_hour": 9, "ip_frequency": 40, "device_change": 0,
            "failed_attempts": 0, "session_duration": 30
        }))
        .await
        .json();
    assert_eq!(defaulted, explicit);
}

#[tokio::test]
async fn test_anomaly_rejects_out_of_range_fields() {
    let server = create_test_server(ready_service());
    for payload in [
        json!({ "login_hour": 24, "ip_frequency": 1, "device_change": 0 }),
        json!({ "login_hour": 5, "ip_frequency": -1, "device_change": 0 }),
        json!({ "login_hour": 5, "ip_frequency": 1, "device_change": 2 }),
        json!({ "login_hour": 5, "ip_frequency": 1, "device_change": -1 }),
        json!({ "login_hour": 5, "device_change": 0 }),
    ] {
        let response = server.post("/anomaly").json(&payload).await;
        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY, "{}", payload);
    }
}

#[tokio::test]
async fn test_unloaded_models_return_503() {
    let server = create_test_server(Arc::new(ThreatScoringService::new()));
    let response = server.post("/predict").json(&json!({ "text": "hello" })).await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json();
    assert_eq!(body["code"], "MODEL_NOT_LOADED");

    let response = server
        .post("/anomaly")
        .json(&json!({ "login_hour": 3, "ip_frequency": 2, "device_change": 1 }))
        .await;
    assert_eq!(response.status_code(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_chat_responder() {
    let server = create_test_server(Arc::new(ThreatScoringService::new()));
    let body: Value = server.post("/chat").json(&json!({ "message": "system status" })).await.json();
    assert_eq!(body["persona"], "SENTINEL-DEFENSE-AI");
    assert!(body["response"].as_str().unwrap().starts_with("Scanning"));
    assert!(body["timestamp"].is_string());

    let response = server.post("/chat").json(&json!({ "message": "" })).await;
    assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
}
