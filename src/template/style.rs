//! Data-driven template styles.
//!
//! A style file (`<templates_dir>/<name>.json`) customises the default
//! layout: colours, font sizes, an optional font file and every fixed label.
//! Missing keys fall back to the defaults below.

use image::Rgba;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::MenuError;

/// RGB colours used by a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Text, cell borders and the outer frame.
    pub primary: [u8; 3],
    /// The corner accent square.
    pub accent: [u8; 3],
    pub background: [u8; 3],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: [34, 52, 73],
            accent: [224, 164, 25],
            background: [237, 239, 241],
        }
    }
}

fn opaque([r, g, b]: [u8; 3]) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}

impl Palette {
    pub fn primary(&self) -> Rgba<u8> {
        opaque(self.primary)
    }

    pub fn accent(&self) -> Rgba<u8> {
        opaque(self.accent)
    }

    pub fn background(&self) -> Rgba<u8> {
        opaque(self.background)
    }
}

/// Fixed text drawn by the default layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub overview_title: String,
    pub index_header: String,
    pub name_header: String,
    pub description_header: String,
    pub note_label: String,
    pub note: String,
    /// Name used for rows without one; `{n}` is the 1-based row number.
    pub placeholder_name: String,
    pub function_header: String,
    pub trigger_method_header: String,
    pub trigger_condition_header: String,
    pub brief_header: String,
    pub usage_label: String,
    pub function_label: String,
    pub trigger_method_label: String,
    pub trigger_condition_label: String,
    pub detail_label: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            overview_title: "Plugin Menu".into(),
            index_header: "#".into(),
            name_header: "Name".into(),
            description_header: "Description".into(),
            note_label: "Note:".into(),
            note: "For detailed usage send\n[menu <name>]".into(),
            placeholder_name: "Plugin {n}".into(),
            function_header: "Function".into(),
            trigger_method_header: "Trigger Method".into(),
            trigger_condition_header: "Trigger Condition".into(),
            brief_header: "Brief".into(),
            usage_label: "Usage:".into(),
            function_label: "Function:".into(),
            trigger_method_label: "Trigger Method:".into(),
            trigger_condition_label: "Trigger Condition:".into(),
            detail_label: "Details:".into(),
        }
    }
}

impl Labels {
    pub fn placeholder(&self, n: usize) -> String {
        self.placeholder_name.replace("{n}", &n.to_string())
    }
}

/// Complete style of a [`DefaultTemplate`](super::DefaultTemplate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub palette: Palette,
    pub font_size: f32,
    pub title_size: f32,
    /// Font file for this template. Relative paths resolve against the
    /// style file's directory. `None` uses the service-wide face.
    pub font: Option<PathBuf>,
    pub labels: Labels,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            font_size: 25.0,
            title_size: 60.0,
            font: None,
            labels: Labels::default(),
        }
    }
}

impl Style {
    /// Read a style file.
    pub fn load(path: &Path) -> Result<Self, MenuError> {
        let text = std::fs::read_to_string(path)?;
        let mut style: Style =
            serde_json::from_str(&text).map_err(|e| MenuError::Config(format!("{}: {}", path.display(), e)))?;
        let resolved = match (&style.font, path.parent()) {
            (Some(font), Some(dir)) if font.is_relative() => Some(dir.join(font)),
            _ => None,
        };
        if resolved.is_some() {
            style.font = resolved;
        }
        Ok(style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn partial_style_keeps_defaults() {
        let style: Style = serde_json::from_str(r#"{"palette": {"accent": [255, 0, 0]}, "labels": {"usage_label": "用法："}}"#).unwrap();
        assert_eq!(style.palette.accent(), Rgba([255, 0, 0, 255]));
        assert_eq!(style.palette.primary, Palette::default().primary);
        assert_eq!(style.labels.usage_label, "用法：");
        assert_eq!(style.labels.function_label, "Function:");
        assert_eq!(style.font_size, 25.0);
    }

    #[test]
    fn placeholder_numbers_rows() {
        assert_eq!(Labels::default().placeholder(3), "Plugin 3");
    }

    #[test]
    fn relative_font_resolves_against_style_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dark.json");
        std::fs::write(&path, r#"{"font": "fonts/cjk.ttf"}"#).unwrap();
        let style = Style::load(&path).unwrap();
        assert_eq!(style.font, Some(dir.path().join("fonts/cjk.ttf")));
    }

    #[test]
    fn malformed_style_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{").unwrap();
        assert!(matches!(Style::load(&path), Err(MenuError::Config(_))));
    }
}
