//! # HTTP Server for Picture Menus
//!
//! Serves menu images as PNG over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! picmenu serve --listen 0.0.0.0:8080
//! ```
//!
//! ## Routes
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /api/status` | listen address, catalog size, templates |
//! | `GET /api/catalog` | visible entries as JSON |
//! | `GET /api/menu` | overview PNG |
//! | `GET /api/menu/:entry` | entry detail PNG |
//! | `GET /api/menu/:entry/:item` | sub-item detail PNG |
//! | `GET /api/query?text=...` | PNG for a chat-style request |
//! | `POST /api/reload` | reload the catalog, JSON report |
//!
//! Requests that resolve to nothing get `404` with the user-facing message.

mod handlers;
mod state;

pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::MenuError;
use crate::menu::MenuService;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/status", get(handlers::catalog::status))
        .route("/api/catalog", get(handlers::catalog::list))
        .route("/api/reload", post(handlers::catalog::reload))
        .route("/api/menu", get(handlers::menu::overview))
        .route("/api/menu/:entry", get(handlers::menu::entry))
        .route("/api/menu/:entry/:item", get(handlers::menu::sub_item))
        .route("/api/query", get(handlers::menu::query))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use picmenu::config::MenuConfig;
/// use picmenu::menu::MenuService;
/// use picmenu::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), picmenu::error::MenuError> {
/// let (menu, _report) = MenuService::from_config(&MenuConfig::default())?;
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
/// };
///
/// serve(config, menu).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig, menu: MenuService) -> Result<(), MenuError> {
    let app_state = Arc::new(AppState::new(config.clone(), menu));
    let app = router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| MenuError::Server(format!("Failed to bind to {}: {}", config.listen_addr, e)))?;
    info!(listen = %config.listen_addr, "picmenu HTTP server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| MenuError::Server(format!("Server error: {}", e)))?;

    Ok(())
}
