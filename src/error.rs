//! # Error Types
//!
//! This module defines error types used throughout the picmenu library.
//!
//! Resolution failures (unknown index, no confident match) are *not* errors:
//! they are ordinary [`Resolution`](crate::resolve::Resolution) values. The
//! types here cover bad input data, layout/configuration mistakes and I/O.

use thiserror::Error;

/// Main error type for picmenu operations
#[derive(Debug, Error)]
pub enum MenuError {
    /// A catalog record could not be turned into an entry
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// A render request referenced a template or box that does not exist
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Font file could not be read or parsed
    #[error("Font error: {0}")]
    Font(String),

    /// Image encoding error
    #[error("Image error: {0}")]
    Image(String),

    /// Configuration or style file could not be parsed
    #[error("Config error: {0}")]
    Config(String),

    /// HTTP server error (bind, serve)
    #[error("Server error: {0}")]
    Server(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-record load errors.
///
/// These are reported by the loader and never abort loading of the
/// remaining records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("record `{record}` is missing required field `{field}`")]
    MissingRequiredField { record: String, field: &'static str },

    #[error("duplicate catalog entry `{0}`")]
    DuplicateKey(String),

    #[error("malformed record in {origin}: {message}")]
    MalformedRecord { origin: String, message: String },
}

/// Layout configuration errors.
///
/// These fail a single render request and leave other requests untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("there is no template named `{0}`")]
    UnknownTemplate(String),

    #[error("there is no box named `{0}`")]
    UnknownBox(String),

    #[error("table row {row} has {found} cells, expected {expected}")]
    RaggedTable {
        row: usize,
        expected: usize,
        found: usize,
    },
}
