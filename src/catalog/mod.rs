//! # Catalog
//!
//! Immutable catalog snapshots: entries, their sub-items, and the single
//! deterministic order used for both listing and index addressing.
//!
//! - [`loader`] builds a [`Catalog`] from JSON records, reporting bad records
//!   without aborting the load.
//! - [`store`] publishes snapshots atomically for concurrent readers.

pub mod loader;
pub mod store;

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

use crate::error::DataError;

pub use loader::{CatalogSource, EntryRecord, LoadReport, SubItemRecord};
pub use store::CatalogStore;

/// Template used when an entry does not name one.
pub const DEFAULT_TEMPLATE: &str = "default";

/// One documented function of a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubItem {
    #[serde(rename = "func")]
    label: String,
    trigger_condition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    trigger_method: Option<String>,
    #[serde(rename = "brief_des", skip_serializing_if = "Option::is_none")]
    brief_description: Option<String>,
    #[serde(rename = "detail_des", skip_serializing_if = "Option::is_none")]
    detail_description: Option<String>,
}

impl SubItem {
    pub fn new(label: impl Into<String>, trigger_condition: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            trigger_condition: trigger_condition.into(),
            trigger_method: None,
            brief_description: None,
            detail_description: None,
        }
    }

    pub fn with_trigger_method(mut self, method: impl Into<String>) -> Self {
        self.trigger_method = Some(method.into());
        self
    }

    pub fn with_brief_description(mut self, text: impl Into<String>) -> Self {
        self.brief_description = Some(text.into());
        self
    }

    pub fn with_detail_description(mut self, text: impl Into<String>) -> Self {
        self.detail_description = Some(text.into());
        self
    }

    /// Function name, the key sub-items are resolved by.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn trigger_condition(&self) -> &str {
        &self.trigger_condition
    }

    pub fn trigger_method(&self) -> Option<&str> {
        self.trigger_method.as_deref()
    }

    pub fn brief_description(&self) -> Option<&str> {
        self.brief_description.as_deref()
    }

    pub fn detail_description(&self) -> Option<&str> {
        self.detail_description.as_deref()
    }
}

/// A listable capability with optional sub-items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    name: String,
    description: String,
    usage: Option<String>,
    #[serde(rename = "funcs")]
    sub_items: Option<Vec<SubItem>>,
    template: String,
    visible: bool,
}

impl CatalogEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn usage(&self) -> Option<&str> {
        self.usage.as_deref()
    }

    /// Sub-items, or `None` when the entry carries no function data at all.
    ///
    /// `Some(&[])` is distinct from `None`: it selects the structured detail
    /// tier with an empty table.
    pub fn sub_items(&self) -> Option<&[SubItem]> {
        self.sub_items.as_deref()
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Builder for [`CatalogEntry`].
#[derive(Debug, Clone)]
pub struct EntryBuilder {
    entry: CatalogEntry,
}

impl EntryBuilder {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            entry: CatalogEntry {
                name: name.into(),
                description: description.into(),
                usage: None,
                sub_items: None,
                template: DEFAULT_TEMPLATE.to_string(),
                visible: true,
            },
        }
    }

    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.entry.usage = Some(usage.into());
        self
    }

    pub fn sub_items(mut self, items: Vec<SubItem>) -> Self {
        self.entry.sub_items = Some(items);
        self
    }

    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.entry.template = template.into();
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.entry.visible = visible;
        self
    }

    pub fn build(self) -> CatalogEntry {
        self.entry
    }
}

/// Ordering of entries within a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collation {
    /// Unicode scalar value order.
    #[default]
    Codepoint,
    /// Lowercased comparison, codepoint order between names equal ignoring case.
    CaseInsensitive,
}

impl Collation {
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        match self {
            Collation::Codepoint => a.cmp(b),
            Collation::CaseInsensitive => a
                .chars()
                .flat_map(char::to_lowercase)
                .cmp(b.chars().flat_map(char::to_lowercase))
                .then_with(|| a.cmp(b)),
        }
    }
}

/// An immutable, sorted set of catalog entries.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    visible: Vec<usize>,
    collation: Collation,
}

impl Catalog {
    /// Build a snapshot. Names must be unique.
    pub fn new(entries: impl IntoIterator<Item = CatalogEntry>, collation: Collation) -> Result<Self, DataError> {
        let mut entries: Vec<CatalogEntry> = entries.into_iter().collect();

        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.name.as_str()) {
                return Err(DataError::DuplicateKey(entry.name.clone()));
            }
        }

        entries.sort_by(|a, b| collation.compare(&a.name, &b.name));
        let visible = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.visible)
            .map(|(i, _)| i)
            .collect();

        Ok(Self {
            entries,
            visible,
            collation,
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Every entry, hidden ones included, in snapshot order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Visible entries in snapshot order. Index addressing uses this sequence.
    pub fn visible(&self) -> impl Iterator<Item = &CatalogEntry> + '_ {
        self.visible.iter().map(|&i| &self.entries[i])
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by exact name, hidden or not.
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn collation(&self) -> Collation {
        self.collation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(catalog: &Catalog) -> Vec<&str> {
        catalog.visible().map(CatalogEntry::name).collect()
    }

    #[test]
    fn entries_are_sorted_by_collation() {
        let entries = ["beta", "Alpha", "gamma"].map(|n| EntryBuilder::new(n, "").build());

        let codepoint = Catalog::new(entries.clone(), Collation::Codepoint).unwrap();
        assert_eq!(names(&codepoint), vec!["Alpha", "beta", "gamma"]);

        let entries = ["beta", "alpha", "Gamma"].map(|n| EntryBuilder::new(n, "").build());
        let codepoint = Catalog::new(entries.clone(), Collation::Codepoint).unwrap();
        assert_eq!(names(&codepoint), vec!["Gamma", "alpha", "beta"]);
        let folded = Catalog::new(entries, Collation::CaseInsensitive).unwrap();
        assert_eq!(names(&folded), vec!["alpha", "beta", "Gamma"]);
    }

    #[test]
    fn hidden_entries_stay_in_the_snapshot() {
        let entries = vec![
            EntryBuilder::new("a", "").build(),
            EntryBuilder::new("b", "").visible(false).build(),
        ];
        let catalog = Catalog::new(entries, Collation::Codepoint).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.visible_len(), 1);
        assert!(catalog.get("b").is_some());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let entries = vec![EntryBuilder::new("a", "").build(), EntryBuilder::new("a", "x").build()];
        assert_eq!(
            Catalog::new(entries, Collation::Codepoint).unwrap_err(),
            DataError::DuplicateKey("a".into())
        );
    }

    #[test]
    fn builder_defaults() {
        let entry = EntryBuilder::new("x", "y").build();
        assert_eq!(entry.template(), DEFAULT_TEMPLATE);
        assert!(entry.is_visible());
        assert_eq!(entry.sub_items(), None);
        assert_eq!(entry.usage(), None);
    }
}
