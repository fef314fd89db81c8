//! Property tests for risk bounds

mod common;

use common::ready_service;
use proptest::prelude::*;
use threat_scoring::scoring::{anomaly_risk, phishing_risk, LoginEvent};

proptest! {
    #[test]
    fn test_phishing_risk_in_range(p in proptest::num::f64::ANY) {
        prop_assert!(phishing_risk(p) <= 100);
    }

    #[test]
    fn test_anomaly_risk_in_range(raw in proptest::num::f64::ANY) {
        prop_assert!(anomaly_risk(raw) <= 100);
    }

    #[test]
    fn test_anomaly_risk_monotonic(a in -1.0f64..0.0, b in -1.0f64..0.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(anomaly_risk(lo) >= anomaly_risk(hi));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_any_text_scores_in_range(text in "[a-zA-Z0-9 !$.,:]{1,200}") {
        prop_assume!(!text.trim().is_empty());
        let p = ready_service().predict_phishing(&text).unwrap();
        prop_assert!(p.risk_score <= 100);
        prop_assert!((p.probability_legitimate + p.probability_phishing - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_any_login_scores_in_range(
        hour in 0.0f64..=23.0,
        ip in 0.0f64..200.0,
        device in 0u8..=1,
        failed in 0u32..30,
        session in proptest::option::of(0.0f64..300.0),
    ) {
        let event = LoginEvent {
            session_duration: session,
            ..LoginEvent::new(hour, ip, f64::from(device), f64::from(failed), 0.0)
        };
        let p = ready_service().predict_anomaly(&event).unwrap();
        prop_assert!(p.risk_score <= 100);
        prop_assert!((-1.0..0.0).contains(&p.anomaly_score));
    }
}
