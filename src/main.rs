use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;

mod api_error;
mod config;
mod http;
mod middleware;
mod models;
mod service;
mod telemetry;

use crate::config::{Config, ReadModelSourceKind};
use crate::http::AppState;
use crate::middleware::cors_middleware;
use crate::service::{
    AbsentWallet, ChainReadModels, ConnectionService, DistributionService, FaucetService,
    JsonRpcWallet, JsonRpcWalletConfig, LogNotifier, ReadModelSource, StaticReadModels,
    VotingService, WalletProvider,
};
use crate::telemetry::init_telemetry;

fn build_wallet(config: &Config) -> anyhow::Result<Arc<dyn WalletProvider>> {
    match &config.wallet.rpc_url {
        Some(url) => {
            let mut wallet_config = JsonRpcWalletConfig::new(url.clone());
            wallet_config.confirmation_poll_interval =
                Duration::from_millis(config.wallet.confirmation_poll_ms);
            tracing::info!(rpc_url = %url, "Using JSON-RPC wallet");
            Ok(Arc::new(JsonRpcWallet::new(wallet_config)?))
        }
        None => {
            tracing::warn!("WALLET_RPC_URL not set, running without a wallet");
            Ok(Arc::new(AbsentWallet))
        }
    }
}

fn build_read_models(
    config: &Config,
    wallet: Arc<dyn WalletProvider>,
) -> anyhow::Result<Arc<dyn ReadModelSource>> {
    let catalog = StaticReadModels::from_file(&config.read_model.fixture_path)?;
    Ok(match config.read_model.source {
        ReadModelSourceKind::Static => Arc::new(catalog),
        ReadModelSourceKind::Chain => Arc::new(ChainReadModels::new(
            catalog,
            wallet,
            config.contracts.aid_distribution.clone(),
            config.contracts.proposal_voting.clone(),
        )),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize telemetry
    init_telemetry(&config.server.rust_log);

    let wallet = build_wallet(&config)?;
    let network = config.network.descriptor();

    let state = web::Data::new(AppState {
        wallet: wallet.clone(),
        connection: Arc::new(ConnectionService::new(
            wallet.clone(),
            network,
            Arc::new(LogNotifier),
        )),
        voting: Arc::new(VotingService::new(
            wallet.clone(),
            config.contracts.proposal_voting.clone(),
        )),
        distribution: Arc::new(DistributionService::new(
            wallet.clone(),
            config.contracts.aid_distribution.clone(),
        )),
        faucet: Arc::new(FaucetService::new(
            wallet.clone(),
            config.contracts.faucet.clone(),
            config.network.chain_id,
        )),
        read_models: build_read_models(&config, wallet)?,
        governance: config.governance.params(),
    });

    // Initial faucet balance, as the dashboard shows it on load
    state.faucet.get_balance().await;

    tracing::info!(
        "Starting aid dashboard server on {}:{}",
        config.server.host,
        config.server.port
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(cors_middleware())
            .wrap(actix_web::middleware::Logger::default())
            .configure(crate::http::configure_routes)
    })
    .bind((config.server.host.clone(), config.server.port))?
    .run();

    // Graceful shutdown
    let server_handle = server.handle();
    tokio::spawn(async move {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for shutdown signal");
            return;
        }
        tracing::info!("Shutdown signal received, stopping server...");
        server_handle.stop(true).await;
    });

    server.await?;
    Ok(())
}
