//! Archive path planning.
//!
//! Assigns each product its path inside the package tree without mutating
//! the product records. Paths are forward-slash strings relative to the
//! package root; uniqueness is enforced afterwards by the validator.

use crate::config::LayoutPolicy;
use aipack_label::ProductRecord;
use aipack_package::PlannedProduct;
use std::path::Path;
use tracing::debug;

/// Plan archive paths for every product under the given layout policy.
pub fn plan_paths(
    products: Vec<ProductRecord>,
    input_dir: &Path,
    layout: LayoutPolicy,
) -> Vec<PlannedProduct> {
    products
        .into_iter()
        .map(|record| {
            let archive_path = match layout {
                LayoutPolicy::Flat => format!(
                    "{}/{}/{}",
                    record.bundle_id,
                    record.collection_id,
                    record.file_name()
                ),
                LayoutPolicy::Preserve => {
                    let relative = match record.label_path.strip_prefix(input_dir) {
                        Ok(relative) => to_unix(relative),
                        Err(_) => {
                            // Label indexed from outside the input root; fall
                            // back to its bare file name.
                            debug!(label = %record.label_path.display(), "label outside input root");
                            record.file_name().to_string()
                        }
                    };
                    format!("{}/{}", record.bundle_id, relative)
                }
            };
            PlannedProduct::new(record, archive_path)
        })
        .collect()
}

fn to_unix(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
