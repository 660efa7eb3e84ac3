//! Bunker Engine - session server for the Bunker party game
//!
//! The Engine is the backend server that:
//! - Loads a content pack (professions, cards, scenarios) from disk
//! - Hosts game rooms over WebSocket
//! - Generates characters and resolves card and profession effects
//! - Serves the static web client

mod application;
mod domain;
mod infrastructure;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::application::ports::outbound::ContentPackPort;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::content_pack::FilePackRepository;
use crate::infrastructure::http;
use crate::infrastructure::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bunker_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Bunker Engine");

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Pack: {}", config.pack_dir().display());
    tracing::info!("  Static files: {}", config.static_dir.display());

    // Load the content pack; a broken pack still starts an (inert) server
    let content = FilePackRepository::new(&config.packs_dir).load_pack(&config.pack_name);

    let port = config.server_port;
    let state = Arc::new(AppState::new(config, content));
    tracing::info!("Application state initialized");

    let app = http::create_router(state);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let server = axum::serve(listener, app);

    // Wait for shutdown signal (Ctrl+C)
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
