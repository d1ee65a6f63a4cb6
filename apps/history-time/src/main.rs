//! # history-time
//!
//! Runs the History Time HTTP server: in-memory games (optionally
//! snapshotted to disk), the built-in or a custom card catalogue, and a
//! static bearer-token table for accounts.

mod config;

use histime::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Tracing (respects RUST_LOG)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting History Time v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env()?.validated();
    info!(?config, "Loaded configuration");

    // -----------------------------------------------------------------------
    // 3. Collaborators
    // -----------------------------------------------------------------------
    let store = match &config.snapshot_path {
        Some(path) => MemoryStore::with_snapshot(path).await?,
        None => MemoryStore::new(),
    };
    let deck = match &config.deck_path {
        Some(path) => CardDeck::from_json_file(path).await?,
        None => CardDeck::builtin(),
    };
    let tokens = match &config.tokens_path {
        Some(path) => TokenTable::from_json_file(path).await?,
        None => TokenTable::new(),
    };
    info!(cards = deck.len(), tokens = tokens.len(), "Collaborators ready");

    // -----------------------------------------------------------------------
    // 4. Serve
    // -----------------------------------------------------------------------
    let server = HistimeServerBuilder::new()
        .bind(&config.bind.to_string())
        .rules(config.rules)
        .identity_config(config.identity)
        .build(store, deck, tokens)
        .await?;
    server.run_until(shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => {
            tracing::error!(error = %e, "Cannot listen for Ctrl-C, running until killed");
            std::future::pending::<()>().await;
        }
    }
}
