//! Error types for package building.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing manifests, the descriptor or the
/// delivery archive.
#[derive(Error, Debug)]
pub enum PackageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A file could not be read for hashing
    #[error("cannot read '{}': {source}", path.display())]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// XML error while rewriting the descriptor template
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Caller-supplied descriptor template does not exist
    #[error("descriptor template not found: {}", path.display())]
    TemplateNotFound { path: PathBuf },

    /// The template lacks an element the descriptor must fill
    #[error("descriptor template is missing element '{path}'")]
    TemplateField { path: String },

    /// The staging directory already exists
    #[error("staging directory already exists: {}", path.display())]
    StagingExists { path: PathBuf },

    /// A product file could not be copied into the staging tree
    #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

/// Result type alias for package operations.
pub type Result<T> = std::result::Result<T, PackageError>;
