// src/main.rs
//! Threat scoring entry point: offline training, one-off scoring and the HTTP server.
use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use threat_scoring::api::server::ScoringServer;
use threat_scoring::scoring::{
    train_and_persist, LoginEvent, ModelStore, ScoringConfig, ThreatScoringService,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "threat_scoring")]
#[command(about = "Phishing and login anomaly threat scoring")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// JSON configuration file (overrides THREAT_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Artifact directory (overrides THREAT_MODELS_DIR)
    #[arg(long, global = true)]
    models_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load artifacts once and serve the HTTP API
    Server {
        /// Port to bind the server to
        #[arg(long)]
        port: Option<u16>,
    },
    /// Generate datasets, fit both models, report and persist artifacts
    Train {
        /// Seed for dataset generation and both forests
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Score one message for phishing
    ScoreText {
        text: String,
    },
    /// Score one login event
    ScoreLogin(LoginArgs),
}

#[derive(ClapArgs)]
struct LoginArgs {
    #[arg(long)]
    login_hour: f64,
    #[arg(long)]
    ip_frequency: f64,
    #[arg(long)]
    device_change: f64,
    #[arg(long, default_value_t = 0.0)]
    failed_attempts: f64,
    #[arg(long, default_value_t = 30.0)]
    session_duration: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging()?;

    info!("Starting threat scoring v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => {
            let mut config = ScoringConfig::from_file(path)?;
            config.apply_env_overrides()?;
            config
        }
        None => ScoringConfig::from_env()?,
    };
    if let Some(dir) = args.models_dir {
        config.storage.models_dir = dir;
    }
    let store = ModelStore::new(config.storage.models_dir.clone());

    match args.command {
        Some(Commands::Train { seed }) => {
            if let Some(seed) = seed {
                config.dataset.seed = seed;
                config.classifier.seed = seed;
                config.anomaly.seed = seed;
            }
            let summary = train_and_persist(&config, &store)?;
            println!("{}", summary.phishing.report);
            println!(
                "Anomaly model: flagged {}/{} rows, recall {:.2}",
                summary.anomaly.evaluation.flagged,
                summary.anomaly.evaluation.rows,
                summary.anomaly.evaluation.recall()
            );
            for path in &summary.artifacts {
                println!("  {}", path.display());
            }
        }
        Some(Commands::ScoreText { text }) => {
            let service = ThreatScoringService::from_store(&store);
            let prediction = service.predict_phishing(&text)?;
            println!("{}", serde_json::to_string_pretty(&prediction)?);
        }
        Some(Commands::ScoreLogin(login)) => {
            let event = LoginEvent::new(
                login.login_hour,
                login.ip_frequency,
                login.device_change,
                login.failed_attempts,
                login.session_duration,
            );
            event.validate()?;
            let service = ThreatScoringService::from_store(&store);
            let prediction = service.predict_anomaly(&event)?;
            println!("{}", serde_json::to_string_pretty(&prediction)?);
        }
        Some(Commands::Server { port }) => {
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config, &store).await?;
        }
        None => {
            info!("No command specified, starting server on port {}", config.server.port);
            serve(config, &store).await?;
        }
    }

    Ok(())
}

async fn serve(config: ScoringConfig, store: &ModelStore) -> Result<()> {
    config.validate()?;
    let service = Arc::new(ThreatScoringService::from_store(store));
    ScoringServer::new(service, config.server).start().await
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=info,h2=info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_max_level(tracing::Level::TRACE)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
