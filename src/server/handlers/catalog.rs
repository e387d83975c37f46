//! Catalog listing and reload handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use std::sync::Arc;

use crate::catalog::CatalogEntry;

use super::super::state::AppState;

/// One visible entry as listed by the API.
#[derive(Debug, Serialize)]
pub struct EntrySummary {
    /// 1-based index usable in `/api/menu/:entry`.
    pub index: usize,
    pub name: String,
    pub description: String,
    pub template: String,
    /// Number of sub-items, `None` when the entry has no function data.
    pub functions: Option<usize>,
}

impl EntrySummary {
    fn new(index: usize, entry: &CatalogEntry) -> Self {
        Self {
            index,
            name: entry.name().to_string(),
            description: entry.description().to_string(),
            template: entry.template().to_string(),
            functions: entry.sub_items().map(<[_]>::len),
        }
    }
}

/// Result of a reload.
#[derive(Debug, Serialize)]
pub struct ReloadSummary {
    pub loaded: usize,
    pub errors: Vec<String>,
}

/// Server status.
#[derive(Debug, Serialize)]
pub struct StatusSummary {
    pub listen_addr: String,
    pub entries: usize,
    pub visible: usize,
    pub templates: Vec<String>,
}

/// GET /api/status - Listen address, catalog size and registered templates.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusSummary> {
    let catalog = state.menu.snapshot();
    Json(StatusSummary {
        listen_addr: state.config.listen_addr.clone(),
        entries: catalog.len(),
        visible: catalog.visible_len(),
        templates: state.menu.templates().names().into_iter().map(String::from).collect(),
    })
}

/// GET /api/catalog - List visible entries in menu order.
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Vec<EntrySummary>> {
    let catalog = state.menu.snapshot();
    Json(
        catalog
            .visible()
            .enumerate()
            .map(|(i, entry)| EntrySummary::new(i + 1, entry))
            .collect(),
    )
}

/// POST /api/reload - Re-read the catalog sources and publish a new snapshot.
pub async fn reload(State(state): State<Arc<AppState>>) -> Result<Json<ReloadSummary>, (StatusCode, String)> {
    let report = tokio::task::spawn_blocking(move || state.menu.reload())
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Task error: {}", e)))?;

    Ok(Json(ReloadSummary {
        loaded: report.loaded,
        errors: report.errors.iter().map(ToString::to_string).collect(),
    }))
}
