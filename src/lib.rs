//! # picmenu - Picture Menu Renderer
//!
//! picmenu turns a catalog of plugin descriptions into PNG menu images for
//! chat bots. It provides:
//!
//! - **Catalog**: entries loaded from JSON records, sorted and published as
//!   atomic snapshots
//! - **Resolution**: 1-based indices or a fuzzy-matching cascade over names
//! - **Layout**: named boxes, alpha compositing and bordered tables
//! - **Templates**: overview, entry and sub-item menus, styled by JSON files
//! - **Server**: an axum HTTP front end serving PNGs
//!
//! ## Quick Start
//!
//! ```no_run
//! use picmenu::{
//!     MenuReply, MenuService,
//!     config::MenuConfig,
//! };
//!
//! // Load config, templates and the catalog
//! let (menu, report) = MenuService::from_config(&MenuConfig::default())?;
//! println!("{} entries loaded", report.loaded);
//!
//! // Answer a chat message
//! if let Some(reply) = menu.answer_text("/menu weather today") {
//!     match reply? {
//!         MenuReply::Image(image) => image.save_png(std::path::Path::new("reply.png"))?,
//!         MenuReply::Failure(failure) => println!("{}", failure),
//!     }
//! }
//!
//! # Ok::<(), picmenu::error::MenuError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`catalog`] | Entries, loading and the snapshot store |
//! | [`resolve`] | Index and fuzzy name resolution |
//! | [`text`] | Font faces, measuring, wrapping, auto-sizing |
//! | [`layout`] | Named-box canvas and table layout |
//! | [`template`] | Menu templates and their registry |
//! | [`query`] | Chat command parsing |
//! | [`menu`] | Resolve-then-render flows |
//! | [`server`] | HTTP server |
//! | [`config`] | Config file |
//! | [`error`] | Error types |

pub mod catalog;
pub mod config;
pub mod error;
pub mod layout;
pub mod menu;
pub mod query;
pub mod raster;
pub mod resolve;
pub mod server;
pub mod template;
pub mod text;

// Re-exports for convenience
pub use catalog::Catalog;
pub use error::MenuError;
pub use menu::{MenuFailure, MenuReply, MenuService};
pub use raster::RenderedImage;
pub use resolve::{Resolution, Resolver};
