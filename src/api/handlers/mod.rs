//! API handlers, split by endpoint

pub mod chat;
pub mod health;
pub mod scoring;

pub use chat::sentinel_chat;
pub use health::health_check;
pub use scoring::{detect_anomaly, predict_phishing};

/// Round a reported float to 4 decimals
pub(crate) fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
