//! Checksum manifest and per-manifest statistics.
//!
//! The checksum manifest lists an MD5 digest for every staged file: each
//! product's label first, then its referenced data files, product by product
//! in index order. Row order is part of the format — the row count and byte
//! size feed directly into the descriptor.

use crate::checksum::{md5_file, md5_files};
use crate::error::Result;
use crate::product::PlannedProduct;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Statistics of one written manifest file, as recorded in the descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct ManifestInfo {
    /// Base file name of the manifest.
    pub file_name: String,
    /// Number of records in the manifest.
    pub records: usize,
    /// Byte size on disk.
    pub bytes: u64,
    /// MD5 of the manifest file itself.
    pub md5: String,
    /// Creation timestamp (UTC, second precision).
    pub created: DateTime<Utc>,
}

impl ManifestInfo {
    /// Stat and hash a manifest that was just written.
    pub fn collect(path: &Path, records: usize, created: DateTime<Utc>) -> Result<Self> {
        let bytes = std::fs::metadata(path)?.len();
        let md5 = md5_file(path)?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        Ok(ManifestInfo {
            file_name,
            records,
            bytes,
            md5,
            created,
        })
    }
}

/// Write the checksum manifest; returns the record count.
///
/// Hashing runs in parallel over the source files; rows are emitted in the
/// original order, so the output is identical to a sequential run.
pub fn write_checksum_manifest(path: &Path, products: &[PlannedProduct]) -> Result<usize> {
    let mut sources: Vec<PathBuf> = Vec::new();
    let mut archive_paths: Vec<String> = Vec::new();
    for product in products {
        sources.push(product.record.label_path.clone());
        archive_paths.push(product.archive_path.clone());
        for file in &product.record.referenced_files {
            sources.push(product.record.label_dir().join(file));
            archive_paths.push(product.data_file_archive_path(file));
        }
    }

    let digests = md5_files(&sources)?;

    let mut out = BufWriter::new(File::create(path)?);
    for (digest, archive_path) in digests.iter().zip(&archive_paths) {
        write!(out, "{digest}\t{archive_path}\r\n")?;
    }
    out.flush()?;
    Ok(archive_paths.len())
}
