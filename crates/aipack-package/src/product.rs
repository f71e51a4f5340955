//! Products paired with their planned archive paths.

use aipack_label::ProductRecord;
use serde::Serialize;

/// One product together with the path it will occupy inside the package.
///
/// Planned paths are forward-slash strings relative to the package root and
/// must be pairwise unique across a run; the pipeline validates this before
/// any staging write happens.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedProduct {
    pub record: ProductRecord,
    pub archive_path: String,
}

impl PlannedProduct {
    pub fn new(record: ProductRecord, archive_path: String) -> Self {
        PlannedProduct {
            record,
            archive_path,
        }
    }

    /// Archive path of a data file staged alongside this product's label.
    pub fn data_file_archive_path(&self, file: &str) -> String {
        match self.archive_path.rsplit_once('/') {
            Some((parent, _)) => format!("{parent}/{file}"),
            None => file.to_string(),
        }
    }
}
