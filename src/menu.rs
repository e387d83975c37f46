//! # Menu Service
//!
//! Ties the pieces together: a catalog store with a reload lifecycle, the
//! template registry and the resolver. Request handlers hold a reference to
//! one [`MenuService`] and call its resolve-then-render flows.
//!
//! Every flow pins one catalog snapshot for its whole duration, so a reload
//! running in parallel never produces a half-old, half-new answer.

use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use crate::catalog::{Catalog, CatalogEntry, CatalogSource, CatalogStore, LoadReport, SubItem};
use crate::config::MenuConfig;
use crate::error::MenuError;
use crate::query::{MenuQuery, QueryParser};
use crate::raster::RenderedImage;
use crate::resolve::{Resolution, Resolver};
use crate::template::{OverviewData, TemplateRegistry, TemplateResources};

/// A request that resolved to nothing renderable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuFailure {
    EntryIndexOutOfRange,
    EntryNotMatched,
    /// The entry exists but has no sub-items to pick from.
    NoFunctionData,
    FunctionIndexOutOfRange,
    FunctionNotMatched,
}

impl MenuFailure {
    /// User-facing text.
    pub fn message(&self) -> &'static str {
        match self {
            MenuFailure::EntryIndexOutOfRange => "There is no plugin with that number",
            MenuFailure::EntryNotMatched => "Plugin name is too vague or does not exist",
            MenuFailure::NoFunctionData => "This plugin has no function data",
            MenuFailure::FunctionIndexOutOfRange => "There is no command with that number",
            MenuFailure::FunctionNotMatched => "Command is too vague or does not exist",
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            MenuFailure::EntryIndexOutOfRange => "entry_index_out_of_range",
            MenuFailure::EntryNotMatched => "entry_not_matched",
            MenuFailure::NoFunctionData => "no_function_data",
            MenuFailure::FunctionIndexOutOfRange => "function_index_out_of_range",
            MenuFailure::FunctionNotMatched => "function_not_matched",
        }
    }
}

impl fmt::Display for MenuFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Answer to a menu request.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuReply {
    Image(RenderedImage),
    Failure(MenuFailure),
}

impl MenuReply {
    pub fn image(self) -> Option<RenderedImage> {
        match self {
            MenuReply::Image(image) => Some(image),
            MenuReply::Failure(_) => None,
        }
    }
}

pub struct MenuService {
    store: CatalogStore,
    source: CatalogSource,
    templates: TemplateRegistry,
    resolver: Resolver,
    parser: QueryParser,
}

impl MenuService {
    /// Build a service from a config: font, templates, then the catalog.
    pub fn from_config(config: &MenuConfig) -> Result<(Self, LoadReport), MenuError> {
        let resources = TemplateResources {
            font: config.font_face()?,
        };
        let mut templates = TemplateRegistry::new(resources)?;
        templates.load_dir(&config.templates_dir);
        info!(templates = ?templates.names(), "templates ready");

        let service = Self::from_parts(Catalog::empty(), templates)
            .with_source(config.catalog_source())
            .with_parser(QueryParser::from_config(config));
        let report = service.reload();
        Ok((service, report))
    }

    /// A service over a fixed catalog. [`reload`](Self::reload) reads from
    /// the source set with [`with_source`](Self::with_source), if any.
    pub fn from_parts(catalog: Catalog, templates: TemplateRegistry) -> Self {
        Self {
            store: CatalogStore::new(catalog),
            source: CatalogSource::default(),
            templates,
            resolver: Resolver::new(),
            parser: QueryParser::default(),
        }
    }

    pub fn with_source(mut self, source: CatalogSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_parser(mut self, parser: QueryParser) -> Self {
        self.parser = parser;
        self
    }

    /// Rebuild the catalog from the source and publish it atomically.
    pub fn reload(&self) -> LoadReport {
        let result: Result<LoadReport, std::convert::Infallible> = self.store.reload_with(|| Ok(self.source.load()));
        match result {
            Ok(report) => report,
            Err(never) => match never {},
        }
    }

    pub fn snapshot(&self) -> Arc<Catalog> {
        self.store.snapshot()
    }

    pub fn templates(&self) -> &TemplateRegistry {
        &self.templates
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn parser(&self) -> &QueryParser {
        &self.parser
    }

    /// Overview of the visible entries, always with the default template.
    pub fn overview(&self) -> Result<RenderedImage, MenuError> {
        let catalog = self.snapshot();
        let data = OverviewData::from_catalog(&catalog);
        self.templates.default_template()?.render_overview(&data)
    }

    /// Entry detail with the entry's own template: the structured tier when
    /// it has sub-items, the minimal tier otherwise.
    pub fn render_entry(&self, entry: &CatalogEntry) -> Result<RenderedImage, MenuError> {
        let template = self.templates.get(entry.template())?;
        match entry.sub_items() {
            Some(_) => template.render_entry(entry),
            None => template.render_entry_minimal(entry),
        }
    }

    /// Sub-item detail with the owning entry's template.
    pub fn render_sub_item(&self, entry: &CatalogEntry, item: &SubItem) -> Result<RenderedImage, MenuError> {
        self.templates.get(entry.template())?.render_sub_item(item)
    }

    pub fn entry_menu(&self, entry_text: &str) -> Result<MenuReply, MenuError> {
        let catalog = self.snapshot();
        let entry = match self.resolver.resolve_entry(entry_text, &catalog) {
            Resolution::Found(entry) => entry,
            other => return Ok(entry_failure(entry_text, other)),
        };
        debug!(input = entry_text, entry = entry.name(), "entry resolved");
        self.render_entry(entry).map(MenuReply::Image)
    }

    pub fn sub_item_menu(&self, entry_text: &str, item_text: &str) -> Result<MenuReply, MenuError> {
        let catalog = self.snapshot();
        let entry = match self.resolver.resolve_entry(entry_text, &catalog) {
            Resolution::Found(entry) => entry,
            other => return Ok(entry_failure(entry_text, other)),
        };
        let Some(items) = entry.sub_items() else {
            debug!(entry = entry.name(), "entry has no function data");
            return Ok(MenuReply::Failure(MenuFailure::NoFunctionData));
        };
        let item = match self.resolver.resolve_sub_item(item_text, items) {
            Resolution::Found(item) => item,
            Resolution::IndexOutOfRange => return Ok(MenuReply::Failure(MenuFailure::FunctionIndexOutOfRange)),
            Resolution::NoConfidentMatch | Resolution::AmbiguousBelowThreshold => {
                debug!(entry = entry.name(), input = item_text, "sub-item not matched");
                return Ok(MenuReply::Failure(MenuFailure::FunctionNotMatched));
            }
        };
        self.render_sub_item(entry, item).map(MenuReply::Image)
    }

    pub fn answer(&self, query: &MenuQuery) -> Result<MenuReply, MenuError> {
        match query {
            MenuQuery::Overview => self.overview().map(MenuReply::Image),
            MenuQuery::Entry(entry) => self.entry_menu(entry),
            MenuQuery::SubItem { entry, item } => self.sub_item_menu(entry, item),
        }
    }

    /// Parse and answer a chat message. `None` if it is not a menu request.
    pub fn answer_text(&self, text: &str) -> Option<Result<MenuReply, MenuError>> {
        let query = self.parser.parse(text)?;
        debug!(text, ?query, "menu request");
        Some(self.answer(&query))
    }
}

fn entry_failure<T>(input: &str, resolution: Resolution<T>) -> MenuReply {
    let failure = match resolution {
        Resolution::IndexOutOfRange => MenuFailure::EntryIndexOutOfRange,
        _ => MenuFailure::EntryNotMatched,
    };
    debug!(input, failure = failure.code(), "entry not resolved");
    MenuReply::Failure(failure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Collation, EntryBuilder};
    use crate::error::LayoutError;
    use pretty_assertions::assert_eq;

    fn service() -> MenuService {
        let catalog = Catalog::new(
            vec![
                EntryBuilder::new("Weather", "Forecasts")
                    .sub_items(vec![
                        SubItem::new("today", "weather today"),
                        SubItem::new("week", "weather week"),
                    ])
                    .build(),
                EntryBuilder::new("Echo", "Repeats text").usage("echo <text>").build(),
                EntryBuilder::new("Fancy", "Uses a missing template").template("fancy").build(),
            ],
            Collation::Codepoint,
        )
        .unwrap();
        let templates = TemplateRegistry::new(TemplateResources::default()).unwrap();
        MenuService::from_parts(catalog, templates)
    }

    fn failure(reply: Result<MenuReply, MenuError>) -> Option<MenuFailure> {
        match reply.unwrap() {
            MenuReply::Failure(f) => Some(f),
            MenuReply::Image(_) => None,
        }
    }

    #[test]
    fn entry_failures_are_distinct() {
        let s = service();
        assert_eq!(failure(s.entry_menu("9")), Some(MenuFailure::EntryIndexOutOfRange));
        assert_eq!(failure(s.entry_menu("qqqqqq")), Some(MenuFailure::EntryNotMatched));
        assert_eq!(failure(s.entry_menu("Weather")), None);
    }

    #[test]
    fn sub_item_failures_are_distinct() {
        let s = service();
        assert_eq!(failure(s.sub_item_menu("Echo", "1")), Some(MenuFailure::NoFunctionData));
        assert_eq!(failure(s.sub_item_menu("Weather", "3")), Some(MenuFailure::FunctionIndexOutOfRange));
        assert_eq!(failure(s.sub_item_menu("Weather", "zzzzz")), Some(MenuFailure::FunctionNotMatched));
        assert_eq!(failure(s.sub_item_menu("Weather", "week")), None);
    }

    #[test]
    fn unknown_template_fails_only_that_request() {
        let s = service();
        let err = s.entry_menu("Fancy").unwrap_err();
        assert!(matches!(err, MenuError::Layout(LayoutError::UnknownTemplate(ref name)) if name == "fancy"));
        assert!(s.entry_menu("Echo").unwrap().image().is_some());
    }

    #[test]
    fn answer_text_dispatches_queries() {
        let s = service();
        assert!(s.answer_text("hello there").is_none());
        assert!(s.answer_text("/menu").unwrap().unwrap().image().is_some());
        assert!(s.answer_text("menu 3 1").unwrap().unwrap().image().is_some());
        assert_eq!(
            failure(s.answer_text("menu Weather 7").unwrap()),
            Some(MenuFailure::FunctionIndexOutOfRange)
        );
    }

    #[test]
    fn reload_swaps_in_the_source_catalog() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.json"), r#"{"name": "Only", "description": "one"}"#).unwrap();
        let s = service().with_source(CatalogSource::new(Collation::Codepoint).menus_dir(dir.path()));

        let before = s.snapshot();
        let report = s.reload();
        assert_eq!(report.loaded, 1);
        assert_eq!(before.len(), 3);
        assert_eq!(s.snapshot().len(), 1);
    }

    #[test]
    fn failure_messages_are_user_facing() {
        assert_eq!(MenuFailure::NoFunctionData.to_string(), "This plugin has no function data");
        assert_ne!(
            MenuFailure::EntryIndexOutOfRange.message(),
            MenuFailure::EntryNotMatched.message()
        );
    }
}
