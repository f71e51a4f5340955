//! Error types for label parsing and indexing.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while parsing labels or building the index.
#[derive(Error, Debug)]
pub enum LabelError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parse error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Invalid file-name pattern
    #[error("invalid name pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// Malformed identity field
    #[error("identity error: {0}")]
    Id(#[from] aipack_common::IdError),

    /// Root element is not a recognized product type
    #[error("root element '{root}' is not a PDS4 product")]
    NotAProduct { root: String },

    /// A required identity field is absent from the label
    #[error("label is missing required field '{field}'")]
    MissingField { field: &'static str },

    /// Input directory does not exist or is not a directory
    #[error("input directory not found: {}", path.display())]
    InputDir { path: PathBuf },
}

/// Result type alias for label operations.
pub type Result<T> = std::result::Result<T, LabelError>;
