//! Run summaries printed on stdout.
//!
//! stdout carries only these payloads (text or JSON); logs stay on stderr.

use aipack_common::OutputFormat;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Summary of one completed packaging run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Delivery name (archive stem and staging directory name).
    pub delivery: String,
    /// Bundle the products belong to.
    pub bundle: String,
    /// Mission acronym derived from the bundle.
    pub mission: String,
    /// Number of packaged products.
    pub products: usize,
    /// Number of referenced data files packaged alongside the labels.
    pub data_files: usize,
    /// Matched files excluded as invalid.
    pub skipped: usize,
    /// Transfer manifest record count.
    pub transfer_records: usize,
    /// Checksum manifest record count.
    pub checksum_records: usize,
    /// Path of the written archive.
    pub archive: PathBuf,
    /// Staging directory, when kept after the run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staging_dir: Option<PathBuf>,
}

impl RunSummary {
    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => to_json(self),
            OutputFormat::Text => {
                let mut out = String::new();
                let _ = writeln!(out, "delivery          {}", self.delivery);
                let _ = writeln!(out, "bundle            {}", self.bundle);
                let _ = writeln!(
                    out,
                    "products          {} ({} skipped)",
                    self.products, self.skipped
                );
                let _ = writeln!(out, "data files        {}", self.data_files);
                let _ = writeln!(out, "transfer records  {}", self.transfer_records);
                let _ = writeln!(out, "checksum records  {}", self.checksum_records);
                let _ = writeln!(out, "archive           {}", self.archive.display());
                if let Some(staging) = &self.staging_dir {
                    let _ = writeln!(out, "staging kept      {}", staging.display());
                }
                out
            }
        }
    }
}

/// One product line of a check run.
#[derive(Debug, Clone, Serialize)]
pub struct CheckEntry {
    pub lidvid: String,
    pub archive_path: String,
}

/// Result of an index-and-validate run (nothing written).
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub bundle: String,
    pub mission: String,
    pub products: usize,
    pub data_files: usize,
    pub skipped: usize,
    pub entries: Vec<CheckEntry>,
}

impl CheckReport {
    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => to_json(self),
            OutputFormat::Text => {
                let mut out = String::new();
                let _ = writeln!(
                    out,
                    "bundle {} ({} products, {} data files, {} skipped)",
                    self.bundle, self.products, self.data_files, self.skipped
                );
                for entry in &self.entries {
                    let _ = writeln!(out, "  {}  ->  {}", entry.lidvid, entry.archive_path);
                }
                out
            }
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}
