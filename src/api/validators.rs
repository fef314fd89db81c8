//! Request validation and error mapping
//!
//! Every rejection is a `(StatusCode, Json<ErrorResponse>)` pair so handlers can
//! return early with `?`.

use axum::{extract::rejection::JsonRejection, http::StatusCode, response::Json};

use crate::api::types::{AnomalyRequest, ErrorResponse};
use crate::scoring::{LoginEvent, ScoringError};

/// Validation result type (unified error response)
pub type ValidationResult = Result<(), (StatusCode, Json<ErrorResponse>)>;

/// Longest accepted message body for `/predict` and `/chat`
pub const MAX_TEXT_LENGTH: usize = 100_000;

pub fn reject(status: StatusCode, code: &str, error: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.to_string(),
        }),
    )
}

/// Non-empty text of bounded length
pub fn validate_text(field: &str, text: &str) -> ValidationResult {
    if text.is_empty() {
        return Err(reject(
            StatusCode::UNPROCESSABLE_ENTITY,
            "INVALID_INPUT",
            format!("{} must contain at least 1 character", field),
        ));
    }
    if text.len() > MAX_TEXT_LENGTH {
        return Err(reject(
            StatusCode::PAYLOAD_TOO_LARGE,
            "TEXT_TOO_LONG",
            format!("{} too long (max {} bytes)", field, MAX_TEXT_LENGTH),
        ));
    }
    Ok(())
}

/// Field ranges of a login event, checked by `LoginEvent::validate`
pub fn validate_login(req: &AnomalyRequest) -> ValidationResult {
    LoginEvent::from(req).validate().map_err(|e| scoring_error(&e))
}

/// Unwrap a JSON body, turning axum's plain-text rejection into an `ErrorResponse`
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, (StatusCode, Json<ErrorResponse>)> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        let status = rejection.status();
        let code = match status {
            StatusCode::UNPROCESSABLE_ENTITY => "INVALID_INPUT",
            StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
            StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
            _ => "MALFORMED_JSON",
        };
        reject(status, code, rejection.body_text())
    })
}

/// Map a core error onto the boundary
pub fn scoring_error(err: &ScoringError) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        ScoringError::InvalidInput(msg) => reject(StatusCode::UNPROCESSABLE_ENTITY, "INVALID_INPUT", msg.clone()),
        e if e.is_model_unavailable() => reject(StatusCode::SERVICE_UNAVAILABLE, "MODEL_NOT_LOADED", "Model not loaded"),
        e => {
            tracing::error!("Scoring failed: {}", e);
            reject(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "Internal scoring error")
        }
    }
}
