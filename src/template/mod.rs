//! # Menu Templates
//!
//! A template turns catalog data into the three menu tiers. Templates are
//! looked up by the name an entry declares in its `template` field.
//!
//! ## Adding a Template
//!
//! - Restyle the default layout: drop `<name>.json` (a [`Style`]) into the
//!   templates directory. It is registered under the file stem.
//! - New layout: implement [`MenuTemplate`] and call
//!   [`TemplateRegistry::register`].
//!
//! The built-in `default` template is always present.

pub mod default;
pub mod style;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, CatalogEntry, DEFAULT_TEMPLATE, SubItem};
use crate::error::{LayoutError, MenuError};
use crate::raster::RenderedImage;
use crate::text::FontFace;

pub use default::{DefaultTemplate, TableText};
pub use style::{Labels, Palette, Style};

/// Shared resources handed to templates before first use.
#[derive(Debug, Clone, Default)]
pub struct TemplateResources {
    /// Face used by templates that do not bring their own.
    pub font: FontFace,
}

/// Rows of the overview tier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverviewData<'a> {
    pub names: Vec<&'a str>,
    pub descriptions: Vec<&'a str>,
}

impl<'a> OverviewData<'a> {
    /// Names and descriptions of the visible entries, in snapshot order.
    pub fn from_catalog(catalog: &'a Catalog) -> Self {
        let (names, descriptions) = catalog.visible().map(|e| (e.name(), e.description())).unzip();
        Self { names, descriptions }
    }

    /// `(name, description)` rows.
    ///
    /// Rows missing a name get `labels`' placeholder name; rows missing a
    /// description get an empty one.
    pub fn rows(&self, labels: &Labels) -> Vec<(String, &'a str)> {
        let count = self.names.len().max(self.descriptions.len());
        (0..count)
            .map(|i| {
                let name = match self.names.get(i) {
                    Some(name) => name.to_string(),
                    None => labels.placeholder(i + 1),
                };
                (name, self.descriptions.get(i).copied().unwrap_or(""))
            })
            .collect()
    }
}

/// Renders the menu tiers.
pub trait MenuTemplate: Send + Sync {
    /// Registry key (e.g., "default").
    fn name(&self) -> &str;

    /// Load fonts and other resources. Called once, at registration.
    fn prepare(&mut self, resources: &TemplateResources) -> Result<(), MenuError>;

    /// Catalog overview: one row per visible entry.
    fn render_overview(&self, data: &OverviewData<'_>) -> Result<RenderedImage, MenuError>;

    /// Entry detail for an entry with sub-items.
    fn render_entry(&self, entry: &CatalogEntry) -> Result<RenderedImage, MenuError>;

    /// Entry detail for an entry without sub-items: usage text only.
    fn render_entry_minimal(&self, entry: &CatalogEntry) -> Result<RenderedImage, MenuError>;

    /// Detail of a single sub-item.
    fn render_sub_item(&self, item: &SubItem) -> Result<RenderedImage, MenuError>;
}

/// Name → template table, populated at startup.
pub struct TemplateRegistry {
    templates: BTreeMap<String, Box<dyn MenuTemplate>>,
    resources: TemplateResources,
}

impl TemplateRegistry {
    /// A registry holding only the built-in default template.
    pub fn new(resources: TemplateResources) -> Result<Self, MenuError> {
        let mut registry = Self {
            templates: BTreeMap::new(),
            resources,
        };
        registry.register(Box::new(DefaultTemplate::new()))?;
        Ok(registry)
    }

    /// Prepare and add a template, replacing any template of the same name.
    pub fn register(&mut self, mut template: Box<dyn MenuTemplate>) -> Result<(), MenuError> {
        template.prepare(&self.resources)?;
        let name = template.name().to_string();
        if self.templates.insert(name.clone(), template).is_some() {
            info!(template = %name, "template replaced");
        } else {
            debug!(template = %name, "template registered");
        }
        Ok(())
    }

    /// Register a [`DefaultTemplate`] for every `*.json` style in `dir`.
    ///
    /// A missing directory is not an error. A style that fails to load is
    /// logged and skipped; the failures are returned.
    pub fn load_dir(&mut self, dir: &Path) -> Vec<MenuError> {
        let read = match fs::read_dir(dir) {
            Ok(read) => read,
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "templates directory not readable, skipping");
                return Vec::new();
            }
        };
        let mut paths: Vec<PathBuf> = read
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut failures = Vec::new();
        for path in paths {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let result = Style::load(&path)
                .and_then(|style| self.register(Box::new(DefaultTemplate::with_style(stem, style))));
            if let Err(e) = result {
                warn!(path = %path.display(), error = %e, "template style rejected");
                failures.push(e);
            }
        }
        failures
    }

    pub fn get(&self, name: &str) -> Result<&dyn MenuTemplate, LayoutError> {
        self.templates
            .get(name)
            .map(|t| t.as_ref())
            .ok_or_else(|| LayoutError::UnknownTemplate(name.to_string()))
    }

    /// The built-in default (or its restyled replacement).
    pub fn default_template(&self) -> Result<&dyn MenuTemplate, LayoutError> {
        self.get(DEFAULT_TEMPLATE)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }
}
