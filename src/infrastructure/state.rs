//! Shared application state

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::application::services::GameService;
use crate::domain::value_objects::ContentTables;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::session::SessionManager;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    /// Game use cases over the loaded content pack
    pub game: GameService,
    /// Active rooms and connections
    pub sessions: RwLock<SessionManager>,
}

impl AppState {
    pub fn new(config: AppConfig, content: ContentTables) -> Self {
        Self {
            config,
            game: GameService::new(Arc::new(content)),
            sessions: RwLock::new(SessionManager::new()),
        }
    }
}
