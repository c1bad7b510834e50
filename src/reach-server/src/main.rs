//! StudioReach — relationship management and outreach for solo facilitators.
//!
//! Main entry point that wires up stores, channel providers, and the
//! HTTP API server.

use clap::Parser;
use reach_api::{ApiServer, AppState};
use reach_campaigns::{CampaignService, DispatchCoordinator};
use reach_channels::{CallingProvider, WhatsAppProvider};
use reach_core::config::AppConfig;
use reach_crm::{OfferingStore, StudentStore};
use reach_platform::AuthService;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "reach-server")]
#[command(about = "Relationship management and outreach for solo facilitators")]
#[command(version)]
struct Cli {
    /// HTTP port (overrides config)
    #[arg(long, env = "STUDIO_REACH__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Prometheus exporter port (overrides config)
    #[arg(long, env = "STUDIO_REACH__METRICS__PORT")]
    metrics_port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reach_server=info,reach_api=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("StudioReach starting up");

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(port) = cli.metrics_port {
        config.metrics.port = port;
    }

    info!(
        http_port = config.api.http_port,
        metrics_port = config.metrics.port,
        "Configuration loaded"
    );

    // In-memory stores. Production: replace with PostgreSQL.
    let students = Arc::new(StudentStore::new());
    let offerings = Arc::new(OfferingStore::new());
    let campaign_store = Arc::new(reach_campaigns::CampaignStore::new());

    // Channel providers
    let whatsapp = Arc::new(WhatsAppProvider::new(config.whatsapp.clone()));
    let calling = Arc::new(CallingProvider::new(config.calling.clone()));

    let dispatcher = DispatchCoordinator::new(
        campaign_store.clone(),
        students.clone(),
        whatsapp,
        calling,
    );
    let campaigns = Arc::new(CampaignService::new(
        campaign_store,
        students.clone(),
        dispatcher,
    ));

    let state = AppState {
        auth: Arc::new(AuthService::new(config.auth.clone())),
        students,
        offerings,
        campaigns,
    };

    let api_server = ApiServer::new(config, state);

    // Start metrics exporter
    if let Err(e) = api_server.start_metrics().await {
        error!(error = %e, "Failed to start metrics exporter");
    }

    info!("StudioReach is ready to serve traffic");

    // Start HTTP server (blocks until shutdown)
    api_server.start_http().await?;

    Ok(())
}
