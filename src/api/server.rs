use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::api::handlers;
use crate::api::server_config::*;
use crate::scoring::config::ServerConfig;
use crate::scoring::{Result, ScoringError, ThreatScoringService};

#[derive(Clone)]
pub struct ScoringServer {
    pub service: Arc<ThreatScoringService>,
    pub config: ServerConfig,
}

impl ScoringServer {
    pub fn new(service: Arc<ThreatScoringService>, config: ServerConfig) -> Self {
        Self { service, config }
    }

    pub fn create_router(self) -> Result<Router> {
        let cors_layer = cors_layer(&self.config.cors_origin)?;
        tracing::info!("CORS configured to allow origin: {}", self.config.cors_origin);

        let state = Arc::new(self);
        Ok(Router::new()
            .route("/predict", post(handlers::predict_phishing))
            .route("/anomaly", post(handlers::detect_anomaly))
            .route("/chat", post(handlers::sentinel_chat))
            .route("/health", get(handlers::health_check))
            .with_state(state)
            .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENCY))
            .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer))
    }

    pub async fn start(self) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let app = self.create_router()?;
        tracing::info!("Server listening on {}", addr);
        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, app.into_make_service()).await?;
        Ok(())
    }
}

/// `*` allows any origin; otherwise a comma-separated list of exact origins
pub fn cors_layer(origins: &str) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(CORS_MAX_AGE);

    if origins.trim() == "*" {
        return Ok(layer.allow_origin(Any));
    }

    let list = origins
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| {
            HeaderValue::from_str(s).map_err(|_| ScoringError::Configuration(format!("Invalid CORS origin: {}", s)))
        })
        .collect::<Result<Vec<HeaderValue>>>()?;
    if list.is_empty() {
        return Err(ScoringError::Configuration("CORS origin list is empty".to_string()));
    }
    Ok(layer.allow_origin(AllowOrigin::list(list)))
}
