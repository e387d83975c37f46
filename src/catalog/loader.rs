//! Catalog loading from JSON.
//!
//! Records come from a menus directory (one `<name>.json` object per file)
//! and/or a catalog file (an array of objects). Each record is validated on
//! its own: a bad record is logged and reported in [`LoadReport`], and the
//! rest of the catalog still loads.

use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::{Catalog, CatalogEntry, Collation, DEFAULT_TEMPLATE, SubItem};
use crate::error::DataError;

/// Inbound sub-item record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubItemRecord {
    pub func: Option<String>,
    pub trigger_condition: Option<String>,
    pub trigger_method: Option<String>,
    pub brief_des: Option<String>,
    pub detail_des: Option<String>,
}

/// Inbound catalog entry record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryRecord {
    pub name: Option<String>,
    pub description: Option<String>,
    pub usage: Option<String>,
    #[serde(alias = "menu_data")]
    pub funcs: Option<Vec<SubItemRecord>>,
    #[serde(alias = "menu_template")]
    pub template: Option<String>,
    #[serde(alias = "menu_visible")]
    pub visible: Option<bool>,
}

fn required(value: Option<String>, record: &str, field: &'static str) -> Result<String, DataError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DataError::MissingRequiredField {
            record: record.to_string(),
            field,
        }),
    }
}

impl SubItemRecord {
    fn into_sub_item(self, record: &str) -> Result<SubItem, DataError> {
        let label = required(self.func, record, "func")?;
        let condition = required(self.trigger_condition, record, "trigger_condition")?;
        Ok(SubItem {
            label,
            trigger_condition: condition,
            trigger_method: self.trigger_method,
            brief_description: self.brief_des,
            detail_description: self.detail_des,
        })
    }
}

impl EntryRecord {
    /// Validate into an entry. `origin` labels errors when the record has no name.
    pub fn into_entry(self, origin: &str) -> Result<CatalogEntry, DataError> {
        let name = required(self.name, origin, "name")?;
        let description = self.description.ok_or_else(|| DataError::MissingRequiredField {
            record: name.clone(),
            field: "description",
        })?;
        let sub_items = self
            .funcs
            .map(|funcs| {
                funcs
                    .into_iter()
                    .map(|f| f.into_sub_item(&name))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        Ok(CatalogEntry {
            name,
            description,
            usage: self.usage,
            sub_items,
            template: self
                .template
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string()),
            visible: self.visible.unwrap_or(true),
        })
    }
}

/// Outcome of a load: how many entries made it, and what was rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub errors: Vec<DataError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Where catalog records are read from.
#[derive(Debug, Clone, Default)]
pub struct CatalogSource {
    pub menus_dir: Option<PathBuf>,
    pub catalog_file: Option<PathBuf>,
    pub collation: Collation,
}

impl CatalogSource {
    pub fn new(collation: Collation) -> Self {
        Self {
            collation,
            ..Self::default()
        }
    }

    pub fn menus_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.menus_dir = Some(dir.into());
        self
    }

    pub fn catalog_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_file = Some(path.into());
        self
    }

    /// Read every configured source and build a snapshot.
    ///
    /// Never fails as a whole: unreadable files and invalid records are
    /// reported per record.
    pub fn load(&self) -> (Catalog, LoadReport) {
        let mut raw = Vec::new();
        let mut errors = Vec::new();

        if let Some(dir) = &self.menus_dir {
            read_menus_dir(dir, &mut raw, &mut errors);
        }
        if let Some(path) = &self.catalog_file {
            read_catalog_file(path, &mut raw, &mut errors);
        }

        let (catalog, mut report) = load_records(raw, self.collation);
        errors.append(&mut report.errors);
        report.errors = errors;
        info!(
            loaded = report.loaded,
            rejected = report.errors.len(),
            visible = catalog.visible_len(),
            "catalog loaded"
        );
        (catalog, report)
    }
}

/// Validate `(origin, json)` records into a snapshot.
///
/// Duplicate names keep the first record and report the rest.
pub fn load_records(records: Vec<(String, Value)>, collation: Collation) -> (Catalog, LoadReport) {
    let mut entries = Vec::with_capacity(records.len());
    let mut errors = Vec::new();
    let mut names = HashSet::new();

    for (origin, value) in records {
        let parsed = serde_json::from_value::<EntryRecord>(value)
            .map_err(|e| DataError::MalformedRecord {
                origin: origin.clone(),
                message: e.to_string(),
            })
            .and_then(|record| record.into_entry(&origin));

        match parsed {
            Ok(entry) if !names.insert(entry.name.clone()) => {
                warn!(origin = %origin, name = entry.name(), "duplicate entry skipped");
                errors.push(DataError::DuplicateKey(entry.name));
            }
            Ok(entry) => {
                debug!(origin = %origin, name = entry.name(), visible = entry.is_visible(), "entry loaded");
                entries.push(entry);
            }
            Err(e) => {
                warn!(origin = %origin, error = %e, "record rejected");
                errors.push(e);
            }
        }
    }

    let catalog = match Catalog::new(entries, collation) {
        Ok(catalog) => catalog,
        Err(e) => {
            errors.push(e);
            Catalog::empty()
        }
    };
    let report = LoadReport {
        loaded: catalog.len(),
        errors,
    };
    (catalog, report)
}

fn read_menus_dir(dir: &Path, raw: &mut Vec<(String, Value)>, errors: &mut Vec<DataError>) {
    let read = match fs::read_dir(dir) {
        Ok(read) => read,
        Err(e) => {
            debug!(dir = %dir.display(), error = %e, "menus directory not readable, skipping");
            return;
        }
    };

    let mut paths: Vec<PathBuf> = read
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    for path in paths {
        let origin = path.display().to_string();
        match read_json(&path) {
            Ok(value) => raw.push((origin, value)),
            Err(message) => {
                warn!(origin = %origin, error = %message, "menu file rejected");
                errors.push(DataError::MalformedRecord { origin, message });
            }
        }
    }
}

fn read_catalog_file(path: &Path, raw: &mut Vec<(String, Value)>, errors: &mut Vec<DataError>) {
    let origin = path.display().to_string();
    match read_json(path) {
        Ok(Value::Array(items)) => {
            for (i, value) in items.into_iter().enumerate() {
                raw.push((format!("{}[{}]", origin, i), value));
            }
        }
        Ok(value @ Value::Object(_)) => raw.push((origin, value)),
        Ok(_) => errors.push(DataError::MalformedRecord {
            origin,
            message: "expected an array of records".to_string(),
        }),
        Err(message) => {
            warn!(origin = %origin, error = %message, "catalog file rejected");
            errors.push(DataError::MalformedRecord { origin, message });
        }
    }
}

fn read_json(path: &Path) -> Result<Value, String> {
    let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&text).map_err(|e| e.to_string())
}
