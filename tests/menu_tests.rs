//! # Menu Tests
//!
//! End-to-end checks through the public API: catalog loading from disk,
//! resolution, the three menu tiers and the HTTP router.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use pretty_assertions::assert_eq;
use std::fs;
use std::sync::Arc;
use tower::ServiceExt;

use picmenu::catalog::{Catalog, Collation, EntryBuilder, SubItem};
use picmenu::config::MenuConfig;
use picmenu::server::{AppState, ServerConfig, router};
use picmenu::template::{DefaultTemplate, MenuTemplate, OverviewData, TemplateRegistry, TemplateResources};
use picmenu::{MenuFailure, MenuReply, MenuService, Resolution, Resolver};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn two_tools() -> Catalog {
    Catalog::new(
        vec![
            EntryBuilder::new("BetaTool", "second tool").build(),
            EntryBuilder::new("AlphaTool", "first tool")
                .sub_items(vec![
                    SubItem::new("start", "alpha start"),
                    SubItem::new("stop", "alpha stop").with_trigger_method("command"),
                ])
                .build(),
        ],
        Collation::Codepoint,
    )
    .unwrap()
}

fn service() -> MenuService {
    let templates = TemplateRegistry::new(TemplateResources::default()).unwrap();
    MenuService::from_parts(two_tools(), templates)
}

fn app() -> axum::Router {
    let state = AppState::new(
        ServerConfig {
            listen_addr: "127.0.0.1:0".to_string(),
        },
        service(),
    );
    router(Arc::new(state))
}

async fn get(uri: &str) -> axum::response::Response {
    app()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

// ============================================================================
// CATALOG AND RESOLUTION
// ============================================================================

#[test]
fn overview_table_lists_visible_entries_in_order() {
    let catalog = two_tools();
    let data = OverviewData::from_catalog(&catalog);
    let mut template = DefaultTemplate::new();
    template.prepare(&TemplateResources::default()).unwrap();

    let grid = template.overview_grid(&data);
    assert_eq!(grid.header, vec!["#", "Name", "Description"]);
    assert_eq!(grid.rows.len(), 2);
    assert_eq!(grid.rows[0], vec!["1", "AlphaTool", "first tool"]);
    assert_eq!(grid.rows[1], vec!["2", "BetaTool", "second tool"]);

    // The rendered overview is framed around that table
    let image = template.render_overview(&data).unwrap();
    assert!(image.width() > 140 && image.height() > 210);
}

#[test]
fn entry_table_columns_follow_sub_item_fields() {
    let catalog = two_tools();
    let mut template = DefaultTemplate::new();
    template.prepare(&TemplateResources::default()).unwrap();

    let alpha = catalog.get("AlphaTool").unwrap();
    let grid = template.entry_grid(alpha);
    assert_eq!(grid.header, vec!["#", "Function", "Trigger Method", "Trigger Condition"]);
    assert_eq!(grid.rows[1], vec!["2", "stop", "command", "alpha stop"]);
}

#[test]
fn prefix_resolves_to_entry() {
    let catalog = two_tools();
    let resolver = Resolver::new();
    match resolver.resolve_entry("Alph", &catalog) {
        Resolution::Found(entry) => assert_eq!(entry.name(), "AlphaTool"),
        other => panic!("expected AlphaTool, got {:?}", other),
    }
    assert!(matches!(resolver.resolve_entry("3", &catalog), Resolution::IndexOutOfRange));
    assert!(matches!(resolver.resolve_entry("2", &catalog), Resolution::Found(e) if e.name() == "BetaTool"));
}

#[test]
fn entry_without_functions_uses_minimal_tier() {
    let menu = service();
    let image = menu.entry_menu("BetaTool").unwrap().image().unwrap();
    // Minimal tier: fixed 600 px body plus frame margins, no usage block
    assert_eq!(image.size(), (740, 210));

    let structured = menu.entry_menu("AlphaTool").unwrap().image().unwrap();
    assert_ne!(structured.size(), image.size());
}

#[test]
fn sub_item_requests_through_the_service() {
    let menu = service();
    assert!(menu.sub_item_menu("1", "2").unwrap().image().is_some());
    assert_eq!(
        menu.sub_item_menu("BetaTool", "1").unwrap(),
        MenuReply::Failure(MenuFailure::NoFunctionData)
    );
    assert_eq!(
        menu.sub_item_menu("AlphaTool", "9").unwrap(),
        MenuReply::Failure(MenuFailure::FunctionIndexOutOfRange)
    );
}

#[test]
fn catalog_loaded_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let menus = dir.path().join("menus");
    fs::create_dir(&menus).unwrap();
    fs::write(
        menus.join("weather.json"),
        r#"{
            "name": "Weather",
            "description": "Forecasts",
            "usage": "weather <city>",
            "funcs": [
                {"func": "today", "trigger_condition": "weather today", "brief_des": "Today's forecast"},
                {"func": "week", "trigger_condition": "weather week"}
            ]
        }"#,
    )
    .unwrap();
    fs::write(menus.join("echo.json"), r#"{"name": "Echo", "description": "Repeats text"}"#).unwrap();
    fs::write(menus.join("broken.json"), r#"{"name": "Broken"}"#).unwrap();
    fs::write(menus.join("hidden.json"), r#"{"name": "Hidden", "description": "x", "visible": false}"#).unwrap();

    let config = MenuConfig {
        menus_dir: menus,
        templates_dir: dir.path().join("templates"),
        ..MenuConfig::default()
    };
    let (menu, report) = MenuService::from_config(&config).unwrap();

    assert_eq!(report.loaded, 3);
    assert_eq!(report.errors.len(), 1);
    let catalog = menu.snapshot();
    let visible: Vec<&str> = catalog.visible().map(|e| e.name()).collect();
    assert_eq!(visible, vec!["Echo", "Weather"]);

    let reply = menu.answer_text("/menu weather today").unwrap().unwrap();
    assert!(reply.image().is_some());
    let reply = menu.answer_text("/menu 2 week").unwrap().unwrap();
    assert!(reply.image().is_some());
}

// ============================================================================
// HTTP ROUTER
// ============================================================================

#[tokio::test]
async fn overview_is_served_as_png() {
    let response = get("/api/menu").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[tokio::test]
async fn unknown_entry_is_not_found() {
    let response = get("/api/menu/qqqqqqqq").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], MenuFailure::EntryNotMatched.message().as_bytes());
}

#[tokio::test]
async fn out_of_range_index_is_not_found() {
    let response = get("/api/menu/3").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sub_item_route_renders() {
    let response = get("/api/menu/AlphaTool/stop").await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn query_route_parses_chat_text() {
    let response = get("/api/query?text=%2Fmenu%20alph").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get("/api/query?text=hello").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn catalog_route_lists_visible_entries() {
    let response = get("/api/catalog").await;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let listed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(listed[0]["index"], 1);
    assert_eq!(listed[0]["name"], "AlphaTool");
    assert_eq!(listed[0]["functions"], 2);
    assert_eq!(listed[1]["functions"], serde_json::Value::Null);
}

#[tokio::test]
async fn status_route_reports_server_config() {
    let response = get("/api/status").await;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let status: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(status["listen_addr"], "127.0.0.1:0");
    assert_eq!(status["entries"], 2);
    assert_eq!(status["visible"], 2);
    assert_eq!(status["templates"], serde_json::json!(["default"]));
}
