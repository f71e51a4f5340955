//! Fixed-width transfer manifest.
//!
//! One CRLF-terminated record per product: the LID left-justified to
//! `lid_len + 1` columns, immediately followed by the archive path
//! left-justified to `path_len` columns. Column widths are computed per run
//! from the longest LID and path. The resulting [`TransferFields`] geometry
//! is the single source of truth for the field offsets the descriptor
//! repeats; it is computed here once and never re-derived.

use crate::error::Result;
use crate::product::PlannedProduct;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Fixed-width geometry of the transfer manifest.
///
/// Field locations are 1-based, per the archive's fixed-width table
/// convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransferFields {
    /// Column at which the identifier field starts (always 1).
    pub lid_start: usize,
    /// Width of the identifier column (longest LID).
    pub lid_len: usize,
    /// Column at which the path field starts (`lid_len + 1`).
    pub path_start: usize,
    /// Width of the path column (longest archive path).
    pub path_len: usize,
}

impl TransferFields {
    /// Compute the geometry for a set of planned products.
    pub fn compute(products: &[PlannedProduct]) -> Self {
        let lid_len = products
            .iter()
            .map(|p| p.record.lid.len())
            .max()
            .unwrap_or(0);
        let path_len = products
            .iter()
            .map(|p| p.archive_path.len())
            .max()
            .unwrap_or(0);
        TransferFields {
            lid_start: 1,
            lid_len,
            path_start: lid_len + 1,
            path_len,
        }
    }

    /// Total bytes of one record, CRLF terminator included.
    pub fn record_length(&self) -> usize {
        self.path_start + self.path_len + 2
    }
}

/// Write the transfer manifest; returns the geometry and the record count.
pub fn write_transfer_manifest(
    path: &Path,
    products: &[PlannedProduct],
) -> Result<(TransferFields, usize)> {
    let fields = TransferFields::compute(products);
    let mut out = BufWriter::new(File::create(path)?);
    for product in products {
        write!(
            out,
            "{:<lid_width$}{:<path_width$}\r\n",
            product.record.lid.as_str(),
            product.archive_path,
            lid_width = fields.lid_len + 1,
            path_width = fields.path_len,
        )?;
    }
    out.flush()?;
    Ok((fields, products.len()))
}
