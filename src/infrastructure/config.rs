//! Application configuration

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding one sub-directory per content pack
    pub packs_dir: PathBuf,
    /// Name of the pack to load at startup
    pub pack_name: String,
    /// Directory served as the static web client
    pub static_dir: PathBuf,

    /// WebSocket server port
    pub server_port: u16,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            packs_dir: env::var("BUNKER_PACKS_DIR")
                .unwrap_or_else(|_| "data/packs".to_string())
                .into(),
            pack_name: env::var("BUNKER_PACK").unwrap_or_else(|_| "classic".to_string()),
            static_dir: env::var("BUNKER_STATIC_DIR")
                .unwrap_or_else(|_| "public".to_string())
                .into(),

            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,
        })
    }

    /// Path of the configured pack
    pub fn pack_dir(&self) -> PathBuf {
        self.packs_dir.join(&self.pack_name)
    }
}
