//! Cross-product validation.
//!
//! All checks run before anything is written to disk; a failed run leaves
//! no staging directory, no manifests and no archive. Checks short-circuit
//! in a fixed order so error reports are deterministic.

use aipack_label::ProductRecord;
use aipack_package::PlannedProduct;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::PathBuf;
use thiserror::Error;

/// Fatal invariant violations over the product set.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Products from more than one bundle in a single run
    #[error("cannot package products from more than one bundle: found {}", bundles.join(", "))]
    MultiBundle { bundles: Vec<String> },

    /// Two products share the same (LID, VID) pair
    #[error("duplicate product LIDVID in this package: {lidvid}")]
    DuplicateProduct { lidvid: String },

    /// A referenced data file is absent next to its label
    #[error("data file '{file}' referenced by product '{lid}' not found in {}", dir.display())]
    MissingDataFile {
        lid: String,
        file: String,
        dir: PathBuf,
    },

    /// Two products map to the same archive path
    #[error("archive path collision: '{path}' is produced by both '{first}' and '{second}'")]
    PathCollision {
        path: String,
        first: String,
        second: String,
    },

    /// The index matched files but produced no valid product
    #[error("no valid products found under {}", dir.display())]
    EmptyIndex { dir: PathBuf },
}

/// Validate the indexed product set: one bundle, unique LIDVIDs, every
/// referenced data file present on disk.
pub fn check_products(products: &[ProductRecord]) -> Result<(), ValidationError> {
    let bundles: BTreeSet<&str> = products.iter().map(|p| p.bundle_id.as_str()).collect();
    if bundles.len() > 1 {
        return Err(ValidationError::MultiBundle {
            bundles: bundles.into_iter().map(str::to_string).collect(),
        });
    }

    let mut seen = HashSet::new();
    for product in products {
        let lidvid = product.lidvid();
        if !seen.insert(lidvid.clone()) {
            return Err(ValidationError::DuplicateProduct {
                lidvid: lidvid.to_string(),
            });
        }
    }

    for product in products {
        for file in &product.referenced_files {
            if !product.label_dir().join(file).is_file() {
                return Err(ValidationError::MissingDataFile {
                    lid: product.lid.to_string(),
                    file: file.clone(),
                    dir: product.label_dir().to_path_buf(),
                });
            }
        }
    }

    Ok(())
}

/// Reject colliding archive paths before any staging write could silently
/// overwrite a product.
pub fn check_archive_paths(planned: &[PlannedProduct]) -> Result<(), ValidationError> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for product in planned {
        if let Some(first) = seen.insert(&product.archive_path, product.record.lid.as_str()) {
            return Err(ValidationError::PathCollision {
                path: product.archive_path.clone(),
                first: first.to_string(),
                second: product.record.lid.to_string(),
            });
        }
    }
    Ok(())
}
