//! Canned analyst chat responder

use axum::{extract::rejection::JsonRejection, http::StatusCode, response::Json};

use crate::api::types::{ChatRequest, ChatResponse, ErrorResponse};
use crate::api::validators::{json_body, validate_text};

const PERSONA: &str = "SENTINEL-DEFENSE-AI";
const CLASSIFICATION: &str = "RESTRICTED-AI-COMM";

/// Keyword groups checked in order; first hit wins
const RESPONSES: &[(&[&str], &str)] = &[
    (
        &["status", "system"],
        "Scanning network grid... All microservices report operational status. Ledger integrity verified. ML models synchronized.",
    ),
    (
        &["alert", "threat"],
        "Real-time threat feed active. 24h risk heatmap indicates peak activity at UTC 0200. No uncontained critical threats detected in current cycle.",
    ),
    (
        &["blockchain", "ledger"],
        "Blockchain integrity at 100%. Genesis block confirmed. All alert blocks verified against SHA-256 signatures.",
    ),
    (
        &["who are you"],
        "I am SENTINEL-01, the autonomous defense-grade AI intelligence powering the threat scoring grid. My primary directive is proactive threat neutralization.",
    ),
    (
        &["help"],
        "Available commands: 'status', 'threat analysis', 'blockchain validation', 'infrastructure scan'. How can I assist, Analyst?",
    ),
];

/// Reply text for a message
pub fn respond(message: &str) -> String {
    let lowered = message.to_lowercase();
    RESPONSES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, reply)| reply.to_string())
        .unwrap_or_else(|| {
            format!(
                "Analysis initiated for query: '{}'. Intelligence suggests standard operational parameters. \
I recommend monitoring the live threat feed for anomalies.",
                message
            )
        })
}

pub async fn sentinel_chat(
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    let payload = json_body(payload)?;
    validate_text("message", &payload.message)?;
    Ok(Json(ChatResponse {
        response: respond(&payload.message),
        persona: PERSONA.to_string(),
        classification: CLASSIFICATION.to_string(),
        timestamp: chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("System STATUS please", "Scanning"; "status")]
    #[test_case("any threat today?", "Real-time"; "threat")]
    #[test_case("check the ledger", "Blockchain"; "ledger")]
    #[test_case("who are you", "I am SENTINEL-01"; "identity")]
    #[test_case("help", "Available commands"; "help")]
    #[test_case("weather", "Analysis initiated for query: 'weather'"; "fallback")]
    fn test_respond(message: &str, prefix: &str) {
        assert!(respond(message).starts_with(prefix));
    }

    #[test]
    fn test_status_wins_over_threat() {
        assert!(respond("system threat").starts_with("Scanning"));
    }
}
