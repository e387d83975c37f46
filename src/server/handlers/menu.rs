//! Menu image handlers.

use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::MenuError;
use crate::menu::{MenuReply, MenuService};

use super::super::state::AppState;

/// Query parameters for the chat-style endpoint.
#[derive(Debug, Deserialize)]
pub struct TextQuery {
    pub text: String,
}

/// Run a menu flow off the async runtime and turn the reply into a response.
///
/// Images are PNG; resolution failures are 404 with the user-facing message;
/// render and configuration errors are 500.
async fn respond<F>(state: Arc<AppState>, flow: F) -> Result<Response, (StatusCode, String)>
where
    F: FnOnce(&MenuService) -> Result<MenuReply, MenuError> + Send + 'static,
{
    // Layout and rasterisation are CPU-bound
    let outcome = tokio::task::spawn_blocking(move || -> Result<Result<Vec<u8>, String>, MenuError> {
        match flow(&state.menu)? {
            MenuReply::Image(image) => Ok(Ok(image.to_png()?)),
            MenuReply::Failure(failure) => Ok(Err(failure.message().to_string())),
        }
    })
    .await
    .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Task error: {}", e)))?
    .map_err(|e| {
        tracing::error!(error = %e, "menu render failed");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    match outcome {
        Ok(png_bytes) => Ok(([(header::CONTENT_TYPE, "image/png")], png_bytes).into_response()),
        Err(message) => Err((StatusCode::NOT_FOUND, message)),
    }
}

/// GET /api/menu - Overview of all visible entries.
pub async fn overview(State(state): State<Arc<AppState>>) -> Result<Response, (StatusCode, String)> {
    respond(state, |menu| menu.overview().map(MenuReply::Image)).await
}

/// GET /api/menu/:entry - Entry detail, by 1-based index or name.
pub async fn entry(
    State(state): State<Arc<AppState>>,
    Path(entry): Path<String>,
) -> Result<Response, (StatusCode, String)> {
    respond(state, move |menu| menu.entry_menu(&entry)).await
}

/// GET /api/menu/:entry/:item - Sub-item detail.
pub async fn sub_item(
    State(state): State<Arc<AppState>>,
    Path((entry, item)): Path<(String, String)>,
) -> Result<Response, (StatusCode, String)> {
    respond(state, move |menu| menu.sub_item_menu(&entry, &item)).await
}

/// GET /api/query?text=... - Answer a chat message such as `/menu weather today`.
pub async fn query(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TextQuery>,
) -> Result<Response, (StatusCode, String)> {
    let Some(parsed) = state.menu.parser().parse(&query.text) else {
        return Err((StatusCode::BAD_REQUEST, "Not a menu request".to_string()));
    };
    respond(state, move |menu| menu.answer(&parsed)).await
}
