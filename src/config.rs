//! # Configuration
//!
//! `MenuConfig` is read from a JSON file (default `menu_config/config.json`).
//! Every key is optional; a missing file means all defaults.
//!
//! ```json
//! {
//!   "menus_dir": "menu_config/menus",
//!   "catalog_file": "menu_config/catalog.json",
//!   "templates_dir": "menu_config/templates",
//!   "font": "menu_config/fonts/NotoSansSC-Regular.ttf",
//!   "collation": "case_insensitive",
//!   "command_prefixes": ["/", "!"],
//!   "menu_keywords": ["menu", "help"],
//!   "listen_addr": "0.0.0.0:8080"
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::catalog::{CatalogSource, Collation};
use crate::error::MenuError;
use crate::text::FontFace;

/// Default location of the config file.
pub const DEFAULT_CONFIG_PATH: &str = "menu_config/config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Directory of per-entry `<name>.json` records.
    pub menus_dir: PathBuf,
    /// Optional file holding an array of records.
    pub catalog_file: Option<PathBuf>,
    /// Directory of template style files.
    pub templates_dir: PathBuf,
    /// TrueType/OpenType font. `None` uses the built-in bitmap face.
    pub font: Option<PathBuf>,
    pub collation: Collation,
    pub command_prefixes: Vec<String>,
    pub menu_keywords: Vec<String>,
    pub listen_addr: String,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            menus_dir: PathBuf::from("menu_config/menus"),
            catalog_file: None,
            templates_dir: PathBuf::from("menu_config/templates"),
            font: None,
            collation: Collation::default(),
            command_prefixes: vec!["/".to_string()],
            menu_keywords: ["menu", "help", "菜单", "功能", "帮助"].map(String::from).to_vec(),
            listen_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

impl MenuConfig {
    /// Parse a config file.
    pub fn load(path: &Path) -> Result<Self, MenuError> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| MenuError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse a config file, falling back to defaults if it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, MenuError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Catalog source described by this config.
    pub fn catalog_source(&self) -> CatalogSource {
        let mut source = CatalogSource::new(self.collation).menus_dir(&self.menus_dir);
        if let Some(file) = &self.catalog_file {
            source = source.catalog_file(file);
        }
        source
    }

    /// Load the configured face, or the built-in one.
    pub fn font_face(&self) -> Result<FontFace, MenuError> {
        match &self.font {
            Some(path) => FontFace::from_file(path),
            None => Ok(FontFace::Bitmap),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = MenuConfig::load_or_default(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, MenuConfig::default());
    }

    #[test]
    fn partial_file_overrides_some_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"collation": "case_insensitive", "menu_keywords": ["cmds"]}"#).unwrap();
        let config = MenuConfig::load_or_default(&path).unwrap();
        assert_eq!(config.collation, Collation::CaseInsensitive);
        assert_eq!(config.menu_keywords, vec!["cmds".to_string()]);
        assert_eq!(config.listen_addr, "127.0.0.1:8080");
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"collation": "klingon"}"#).unwrap();
        assert!(matches!(MenuConfig::load_or_default(&path), Err(MenuError::Config(_))));
    }

    #[test]
    fn catalog_source_follows_config() {
        let config = MenuConfig {
            catalog_file: Some("all.json".into()),
            ..MenuConfig::default()
        };
        let source = config.catalog_source();
        assert_eq!(source.menus_dir, Some(PathBuf::from("menu_config/menus")));
        assert_eq!(source.catalog_file, Some(PathBuf::from("all.json")));
    }
}
