//! Configuration for a packaging run.
//!
//! The CLI resolves flags and `AIPACK_*` environment overrides into a
//! [`PackagerConfig`]; the struct is validated once before the pipeline
//! starts so misconfiguration never surfaces halfway through a run.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Archive tree layout policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutPolicy {
    /// `bundle/collection/label_filename`
    #[default]
    Flat,

    /// `bundle/<label path relative to the input root>`
    Preserve,
}

impl std::fmt::Display for LayoutPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutPolicy::Flat => write!(f, "flat"),
            LayoutPolicy::Preserve => write!(f, "preserve"),
        }
    }
}

/// Settings for one packaging run.
#[derive(Debug, Clone)]
pub struct PackagerConfig {
    /// Root directory containing the product labels.
    pub input_dir: PathBuf,
    /// File-name pattern matching labels.
    pub pattern: String,
    /// Descend into subdirectories of the input root.
    pub recursive: bool,
    /// Directory receiving the staging tree and the archive.
    pub output_dir: PathBuf,
    /// Descriptor template override; the bundled template is used when unset.
    pub template: Option<PathBuf>,
    /// Archive tree layout.
    pub layout: LayoutPolicy,
    /// Remove the staging tree after the archive is written.
    pub clean: bool,
    /// Sender code; defaults to the mission acronym of the bundle.
    pub sendfrom: Option<String>,
    /// Recipient code; defaults to the archive code.
    pub sendto: Option<String>,
}

impl Default for PackagerConfig {
    fn default() -> Self {
        PackagerConfig {
            input_dir: PathBuf::from("."),
            pattern: "*.xml".to_string(),
            recursive: true,
            output_dir: PathBuf::from("."),
            template: None,
            layout: LayoutPolicy::default(),
            clean: true,
            sendfrom: None,
            sendto: None,
        }
    }
}

impl PackagerConfig {
    /// Configuration rooted at an input directory, otherwise defaults.
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        PackagerConfig {
            input_dir: input_dir.into(),
            ..PackagerConfig::default()
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_template(mut self, template: impl Into<PathBuf>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn with_layout(mut self, layout: LayoutPolicy) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_clean(mut self, clean: bool) -> Self {
        self.clean = clean;
        self
    }

    pub fn with_sender(mut self, sendfrom: impl Into<String>) -> Self {
        self.sendfrom = Some(sendfrom.into());
        self
    }

    pub fn with_recipient(mut self, sendto: impl Into<String>) -> Self {
        self.sendto = Some(sendto.into());
        self
    }

    /// Reject settings that could only fail mid-run.
    pub fn validate(&self) -> Result<(), String> {
        if self.pattern.trim().is_empty() {
            return Err("label pattern must not be empty".to_string());
        }
        if matches!(&self.sendfrom, Some(code) if code.trim().is_empty()) {
            return Err("sender code must not be empty".to_string());
        }
        if matches!(&self.sendto, Some(code) if code.trim().is_empty()) {
            return Err("recipient code must not be empty".to_string());
        }
        Ok(())
    }
}
