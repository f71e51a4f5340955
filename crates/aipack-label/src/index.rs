//! Product indexer: directory scan plus per-file label parsing.
//!
//! Files that match the name pattern but fail to parse as PDS4 products are
//! excluded and counted, never fatal. The candidate list is sorted so the
//! index order (and everything downstream that depends on it, manifests
//! included) is deterministic.

use crate::error::{LabelError, Result};
use crate::parse::parse_label;
use crate::record::ProductRecord;
use glob::Pattern;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Result of an index run.
#[derive(Debug)]
pub struct IndexReport {
    /// Valid products, in lexicographic label-path order.
    pub products: Vec<ProductRecord>,
    /// Number of matched files excluded as invalid.
    pub skipped: usize,
}

/// Index every label under `root` whose file name matches `pattern`.
pub fn index_products(root: &Path, pattern: &str, recursive: bool) -> Result<IndexReport> {
    if !root.is_dir() {
        return Err(LabelError::InputDir {
            path: root.to_path_buf(),
        });
    }
    let pattern = Pattern::new(pattern)?;

    let mut candidates = collect_candidates(root, &pattern, recursive)?;
    candidates.sort();
    debug!(
        root = %root.display(),
        candidates = candidates.len(),
        recursive,
        "scanning for products"
    );

    let mut products = Vec::with_capacity(candidates.len());
    let mut skipped = 0usize;
    for path in candidates {
        match parse_label(&path).and_then(|parsed| ProductRecord::from_label(path.clone(), parsed))
        {
            Ok(record) => products.push(record),
            Err(err) => {
                warn!(file = %path.display(), %err, "not a valid PDS4 product, skipping");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, "products excluded as invalid");
    }

    Ok(IndexReport { products, skipped })
}

fn collect_candidates(root: &Path, pattern: &Pattern, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut candidates = Vec::new();
    if recursive {
        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(%err, "unreadable directory entry, skipping");
                    continue;
                }
            };
            if entry.file_type().is_file() && matches_name(entry.path(), pattern) {
                candidates.push(entry.path().to_path_buf());
            }
        }
    } else {
        for entry in std::fs::read_dir(root)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && matches_name(&path, pattern) {
                candidates.push(path);
            }
        }
    }
    Ok(candidates)
}

fn matches_name(path: &Path, pattern: &Pattern) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| pattern.matches(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_label(dir: &Path, name: &str, lid: &str, vid: &str, data_files: &[&str]) {
        let files: String = data_files
            .iter()
            .map(|f| format!("<File><file_name>{f}</file_name></File>"))
            .collect();
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<Product_Observational xmlns="http://pds.nasa.gov/pds4/pds/v1">
  <Identification_Area>
    <logical_identifier>{lid}</logical_identifier>
    <version_id>{vid}</version_id>
  </Identification_Area>
  <File_Area_Observational>{files}</File_Area_Observational>
</Product_Observational>
"#
        );
        fs::write(dir.join(name), xml).unwrap();
    }

    #[test]
    fn indexes_valid_products_in_order() {
        let tmp = TempDir::new().unwrap();
        write_label(
            tmp.path(),
            "b_product.xml",
            "urn:esa:psa:em16_tgo_frd:data_raw:prod_b",
            "1.0",
            &["b.dat"],
        );
        write_label(
            tmp.path(),
            "a_product.xml",
            "urn:esa:psa:em16_tgo_frd:data_raw:prod_a",
            "1.0",
            &[],
        );

        let report = index_products(tmp.path(), "*.xml", false).unwrap();
        assert_eq!(report.products.len(), 2);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.products[0].file_name(), "a_product.xml");
        assert_eq!(report.products[1].file_name(), "b_product.xml");
        assert_eq!(report.products[1].referenced_files, vec!["b.dat"]);
    }

    #[test]
    fn invalid_files_are_counted_not_fatal() {
        let tmp = TempDir::new().unwrap();
        write_label(
            tmp.path(),
            "good.xml",
            "urn:esa:psa:em16_tgo_frd:data_raw:prod",
            "1.0",
            &[],
        );
        fs::write(tmp.path().join("junk.xml"), "not xml at all <<<").unwrap();
        fs::write(
            tmp.path().join("other_schema.xml"),
            r#"<Ingest_LDD xmlns="http://pds.nasa.gov/pds4/pds/v1"><name>x</name></Ingest_LDD>"#,
        )
        .unwrap();

        let report = index_products(tmp.path(), "*.xml", false).unwrap();
        assert_eq!(report.products.len(), 1);
        assert_eq!(report.skipped, 2);
    }

    #[test]
    fn recursive_scan_descends() {
        let tmp = TempDir::new().unwrap();
        let sub = tmp.path().join("data_raw").join("2016");
        fs::create_dir_all(&sub).unwrap();
        write_label(
            &sub,
            "deep.xml",
            "urn:esa:psa:em16_tgo_frd:data_raw:deep",
            "1.0",
            &[],
        );

        let flat = index_products(tmp.path(), "*.xml", false).unwrap();
        assert!(flat.products.is_empty());

        let deep = index_products(tmp.path(), "*.xml", true).unwrap();
        assert_eq!(deep.products.len(), 1);
    }

    #[test]
    fn pattern_filters_names() {
        let tmp = TempDir::new().unwrap();
        write_label(
            tmp.path(),
            "frd_raw.xml",
            "urn:esa:psa:em16_tgo_frd:data_raw:prod",
            "1.0",
            &[],
        );
        write_label(
            tmp.path(),
            "cam_raw.xml",
            "urn:esa:psa:em16_tgo_cam:data_raw:prod",
            "1.0",
            &[],
        );

        let report = index_products(tmp.path(), "frd_*.xml", false).unwrap();
        assert_eq!(report.products.len(), 1);
        assert_eq!(report.products[0].bundle_id, "em16_tgo_frd");
    }

    #[test]
    fn missing_root_is_fatal() {
        let err = index_products(Path::new("/nonexistent/root"), "*.xml", true).unwrap_err();
        assert!(matches!(err, LabelError::InputDir { .. }));
    }
}
