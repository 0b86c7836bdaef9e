// Application state shared by all handlers
// Holds the loaded configuration and the session registry

use crate::chat::SessionManager;
use crate::config::Config;

/// Main application state
pub struct AppState {
    /// Configuration the server was started with
    pub config: Config,
    /// Running chat sessions
    pub sessions: SessionManager,
}

impl AppState {
    /// Create application state from configuration
    pub fn new(config: Config) -> Self {
        let sessions = SessionManager::new(config.surfaces(), config.assistant.max_sessions);
        Self { config, sessions }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
