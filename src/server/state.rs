//! Server state and configuration.

use crate::menu::MenuService;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub menu: MenuService,
}

impl AppState {
    pub fn new(config: ServerConfig, menu: MenuService) -> Self {
        Self { config, menu }
    }
}
