use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use watchlist_sync::{
    config::Config,
    db::{FileStore, KeyValueStore},
    services::{appwrite::AppwriteClient, watchlist::AppwriteWatchlist},
    WatchlistSession,
};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env()?;

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.storage_path)?);
    let client = AppwriteClient::from_config(&config);
    let remote = AppwriteWatchlist::from_config(client.clone(), &config);

    let mut session = WatchlistSession::new(Arc::new(client), Arc::new(remote), store);
    if let Some(report) = session.start().await {
        tracing::info!(
            migrated = report.migrated,
            failed = report.failed,
            already_migrated = report.already_migrated,
            "Migration finished"
        );
    }

    tracing::info!(
        authenticated = session.is_authenticated(),
        entries = session.entries().len(),
        "Watchlist ready"
    );
    for entry in session.entries() {
        tracing::info!(
            media = %entry.key(),
            title = %entry.title,
            added_at = %entry.added_at,
            "Watchlist entry"
        );
    }

    Ok(())
}
