//! The immutable product record produced by the indexer.

use crate::error::Result;
use crate::parse::ParsedLabel;
use aipack_common::{Lid, LidVid, Vid};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One indexed product label.
///
/// Records are immutable after indexing; archive paths are planned into a
/// separate structure rather than written back into the record.
#[derive(Debug, Clone, Serialize)]
pub struct ProductRecord {
    /// Absolute or caller-relative path of the label file.
    pub label_path: PathBuf,
    /// Bundle segment of the LID.
    pub bundle_id: String,
    /// Collection segment of the LID.
    pub collection_id: String,
    /// Logical identifier.
    pub lid: Lid,
    /// Version identifier.
    pub vid: Vid,
    /// Data files referenced by the label, relative to the label's directory.
    pub referenced_files: Vec<String>,
}

impl ProductRecord {
    /// Build a record from a parsed label, validating its identifiers.
    pub fn from_label(label_path: PathBuf, parsed: ParsedLabel) -> Result<Self> {
        let lid = Lid::parse(&parsed.lid)?;
        let vid = Vid::parse(&parsed.vid)?;
        Ok(ProductRecord {
            label_path,
            bundle_id: lid.bundle().to_string(),
            collection_id: lid.collection().to_string(),
            lid,
            vid,
            referenced_files: parsed.referenced_files,
        })
    }

    /// The (LID, VID) pair identifying this product version.
    pub fn lidvid(&self) -> LidVid {
        LidVid::new(self.lid.clone(), self.vid.clone())
    }

    /// Directory containing the label (and its referenced data files).
    pub fn label_dir(&self) -> &Path {
        self.label_path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// File name of the label.
    pub fn file_name(&self) -> &str {
        self.label_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}
