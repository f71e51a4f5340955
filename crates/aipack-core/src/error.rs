//! Unified error type for the pipeline.

use crate::exit_codes::ExitCode;
use crate::validate::ValidationError;
use aipack_label::LabelError;
use aipack_package::PackageError;
use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by a packaging run.
#[derive(Error, Debug)]
pub enum Error {
    /// Indexing failed (bad input directory, bad pattern)
    #[error(transparent)]
    Label(#[from] LabelError),

    /// A fatal cross-product invariant was violated
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Manifest, descriptor or archive writing failed
    #[error(transparent)]
    Package(#[from] PackageError),

    /// Invalid run configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Map the error to the CLI's stable exit code.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Error::Validation(_) => ExitCode::ValidationFailed,
            Error::Label(_) | Error::Package(_) | Error::Io(_) => ExitCode::ResourceFailed,
            Error::Config(_) => ExitCode::ConfigError,
        }
    }
}
