use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mosaify_cli::commands::{self, Cli};
use mosaify_cli::config::StoreConfig;
use mosaify_db::EntityStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "mosaify_cli=info,mosaify_db=info".into());
    if cli.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // --- Configuration ---
    let database_url = match cli.database_url.clone() {
        Some(url) => url,
        None => StoreConfig::from_env()?.database_url,
    };

    // --- Database ---
    let mut store = EntityStore::new();
    store.connect(&database_url).await?;
    store.health_check().await?;
    tracing::info!("Database health check passed");

    let result = commands::run(&mut store, &cli.command).await;
    store.disconnect().await;
    result
}
