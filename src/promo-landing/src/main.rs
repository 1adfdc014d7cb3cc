//! Promo landing: voucher claim page for time-boxed NFT campaigns.
//!
//! Main entry point that wires the wallet provider, the session registry
//! and the HTTP server together.

use clap::Parser;
use promo_api::ApiServer;
use promo_core::config::AppConfig;
use promo_core::{Clock, SystemClock};
use promo_landing_page::SessionRegistry;
use promo_wallet::{HttpWalletProvider, InMemoryWalletProvider, WalletProvider};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "promo-landing")]
#[command(about = "Voucher claim landing page for time-boxed NFT campaigns")]
#[command(version)]
struct Cli {
    /// HTTP port (overrides config)
    #[arg(long, env = "PROMO_LANDING__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Wallet provider base URL (overrides config)
    #[arg(long, env = "PROMO_LANDING__WALLET__BASE_URL")]
    wallet_url: Option<String>,

    /// Phase polling interval in milliseconds (overrides config)
    #[arg(long, env = "PROMO_LANDING__POLLING__TICK_INTERVAL_MS")]
    tick_ms: Option<u64>,

    /// Serve an in-memory demo campaign instead of calling the provider
    #[arg(long, default_value_t = false)]
    demo: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "promo_landing=info,promo_landing_page=info,promo_wallet=info,promo_api=info,tower_http=info"
                    .into()
            }),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("Promo landing starting up");

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }
    if let Some(url) = cli.wallet_url {
        config.wallet.base_url = url;
    }
    if let Some(tick_ms) = cli.tick_ms {
        config.polling.tick_interval_ms = tick_ms;
    }
    config.validate()?;

    info!(
        node_id = %config.node_id,
        http_port = config.api.http_port,
        wallet = %config.wallet.base_url,
        tick_ms = config.polling.tick_interval_ms,
        demo = cli.demo,
        "Configuration loaded"
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let provider: Arc<dyn WalletProvider> = if cli.demo {
        info!("Demo mode: open /?campaignId=demo&voucherId=demo-1");
        Arc::new(InMemoryWalletProvider::demo(clock.now_ms()))
    } else {
        Arc::new(HttpWalletProvider::new(&config.wallet)?)
    };

    let registry = Arc::new(SessionRegistry::new(
        provider,
        clock,
        &config.polling,
        &config.session,
    ));

    let api_server = ApiServer::new(config.clone(), registry.clone());

    // Start metrics exporter
    if let Err(e) = api_server.start_metrics().await {
        error!(error = %e, "Failed to start metrics exporter");
    }

    // Spawn idle session eviction
    let registry_for_maintenance = registry.clone();
    let maintenance_every = Duration::from_secs(config.session.maintenance_interval_secs.max(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(maintenance_every);
        loop {
            interval.tick().await;
            registry_for_maintenance.evict_idle();
        }
    });

    info!("Promo landing is ready to serve traffic");

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
        }
        info!("Shutdown signal received");
    };

    // Start HTTP server (blocks until shutdown)
    api_server.start_http(shutdown).await?;

    registry.unmount_all();
    info!("Promo landing stopped");

    Ok(())
}
