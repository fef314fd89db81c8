//! Train, persist, reload and score

mod common;

use common::{LEGITIMATE_TEXT, PHISHING_TEXT, TRAINED};
use pretty_assertions::assert_eq;
use threat_scoring::scoring::dataset::login_table;
use threat_scoring::scoring::{
    train_all, train_and_persist, AnomalyDetector, ArtifactKind, JsonCodec, LoginEvent, ModelStore,
    PhishingDetector, ScoringConfig, ThreatScoringService, TrainingSummary,
};

fn sample_events() -> Vec<LoginEvent> {
    vec![
        LoginEvent::new(3.0, 2.0, 1.0, 7.0, 2.0),
        LoginEvent::new(10.0, 55.0, 0.0, 0.0, 30.0),
        LoginEvent::new(14.0, 40.0, 0.0, 1.0, 45.0),
        LoginEvent { session_duration: None, ..LoginEvent::new(9.0, 60.0, 0.0, 0.0, 0.0) },
    ]
}

#[test]
fn test_persisted_models_score_identically() {
    let dir = tempfile::tempdir().unwrap();
    let store = ModelStore::new(dir.path());
    let summary = train_and_persist(&ScoringConfig::default(), &store).unwrap();

    for kind in ArtifactKind::ALL {
        assert!(store.exists(kind), "{} missing", kind);
    }
    assert_eq!(summary.artifacts.len(), 4);

    let service = ThreatScoringService::from_store(&store);
    assert!(service.health().phishing_model_loaded);
    assert!(service.health().anomaly_model_loaded);

    for text in [PHISHING_TEXT, LEGITIMATE_TEXT, "Your invoice is attached"] {
        assert_eq!(service.predict_phishing(text).unwrap(), summary.phishing.detector.predict(text));
    }
    for event in sample_events() {
        assert_eq!(service.predict_anomaly(&event).unwrap(), summary.anomaly.detector.predict(&event));
    }
}

#[test]
fn test_json_codec_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let store = ModelStore::with_codec(dir.path(), JsonCodec);
    TRAINED.phishing.detector.save(&store).unwrap();
    TRAINED.anomaly.detector.save(&store).unwrap();

    let phishing = PhishingDetector::load(&store).unwrap().unwrap();
    let anomaly = AnomalyDetector::load(&store).unwrap().unwrap();
    assert_eq!(phishing.predict(PHISHING_TEXT), TRAINED.phishing.detector.predict(PHISHING_TEXT));
    for event in sample_events() {
        assert_eq!(anomaly.predict(&event), TRAINED.anomaly.detector.predict(&event));
    }
}

#[test]
fn test_training_is_deterministic() {
    let config = ScoringConfig::default();
    assert_eq!(login_table(&config.dataset).unwrap(), login_table(&config.dataset).unwrap());

    let again = train_all(&config).unwrap();
    let forest_bytes = |summary: &TrainingSummary| {
        bincode::serialize(summary.phishing.detector.classifier()).unwrap()
    };
    assert_eq!(forest_bytes(&again), forest_bytes(&*TRAINED));
    assert_eq!(again.phishing.detector.vectorizer(), TRAINED.phishing.detector.vectorizer());
    assert_eq!(again.anomaly.detector, TRAINED.anomaly.detector);
    assert_eq!(again.phishing.report, TRAINED.phishing.report);
}

#[test]
fn test_different_seed_changes_login_table() {
    let mut config = ScoringConfig::default();
    let a = login_table(&config.dataset).unwrap();
    config.dataset.seed = 7;
    let b = login_table(&config.dataset).unwrap();
    assert_ne!(a.rows, b.rows);
}

#[test]
fn test_corrupt_schema_marks_anomaly_unloaded() {
    let dir = tempfile::tempdir().unwrap();
    let store = ModelStore::new(dir.path());
    TRAINED.phishing.detector.save(&store).unwrap();
    TRAINED.anomaly.detector.save(&store).unwrap();
    std::fs::write(store.path_for(ArtifactKind::FeatureSchema), b"garbage").unwrap();

    let service = ThreatScoringService::from_store(&store);
    assert!(service.health().phishing_model_loaded);
    assert!(!service.health().anomaly_model_loaded);
    let err = service.predict_anomaly(&LoginEvent::new(3.0, 2.0, 1.0, 7.0, 2.0)).unwrap_err();
    assert!(err.is_model_unavailable());
}
