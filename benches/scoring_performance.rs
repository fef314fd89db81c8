//! Per-request scoring latency
//!
//! Targets:
//! - phishing text: < 1ms
//! - login event: < 1ms

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use threat_scoring::scoring::{train_all, LoginEvent, ScoringConfig, ThreatScoringService};

fn trained_service() -> ThreatScoringService {
    let summary = train_all(&ScoringConfig::default()).expect("training failed");
    ThreatScoringService::from_detectors(summary.phishing.detector, summary.anomaly.detector)
}

fn bench_predict_phishing(c: &mut Criterion) {
    let service = trained_service();
    let text = "URGENT: Your account has been suspended. Click here to verify your identity immediately!";

    c.bench_function("predict_phishing", |b| {
        b.iter(|| service.predict_phishing(black_box(text)).expect("predict failed"));
    });
}

fn bench_predict_anomaly(c: &mut Criterion) {
    let service = trained_service();
    let event = LoginEvent::new(3.0, 2.0, 1.0, 7.0, 2.0);

    c.bench_function("predict_anomaly", |b| {
        b.iter(|| service.predict_anomaly(black_box(&event)).expect("predict failed"));
    });
}

criterion_group!(benches, bench_predict_phishing, bench_predict_anomaly);
criterion_main!(benches);
