//! aipack core library.
//!
//! This library orchestrates the delivery pipeline:
//! - Configuration for a packaging run
//! - Cross-product validation (fatal invariants)
//! - Archive path planning (flat or preserved layout)
//! - Stage-by-stage pipeline execution
//! - Exit codes, logging and run summaries for the CLI
//!
//! The binary entry point is in `main.rs`.

pub mod config;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod pipeline;
pub mod plan;
pub mod report;
pub mod validate;

pub use config::{LayoutPolicy, PackagerConfig};
pub use error::{Error, Result};
pub use exit_codes::ExitCode;
pub use pipeline::Packager;
pub use report::{CheckReport, RunSummary};
pub use validate::ValidationError;
