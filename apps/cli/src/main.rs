use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use dotenv::dotenv;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod terminal;

use auth_cell::SessionManager;
use shared_api::ApiClient;
use shared_config::ClientConfig;
use shared_storage::FileStore;

use commands::{App, Cli};
use terminal::{TerminalNavigator, TerminalNotifier};

#[tokio::main]
async fn main() -> Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env();
    info!("Using MediCare API at {}", config.api_base_url);
    debug!("Session storage at {}", config.storage_path.display());

    let store = Arc::new(FileStore::new(config.storage_path.clone()));
    let api = Arc::new(ApiClient::new(&config, store));
    let navigator = Arc::new(TerminalNavigator::new());
    let session = Arc::new(SessionManager::new(
        &config,
        api,
        navigator.clone(),
        Arc::new(TerminalNotifier),
    ));

    let app = App { config, session };
    let result = commands::run(cli.command, &app).await;

    // let scheduled redirects land before exiting
    navigator.settle().await;

    result
}
