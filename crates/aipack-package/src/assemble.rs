//! Staging tree population and final archive assembly.
//!
//! The staging directory is created exclusively (a leftover directory from a
//! previous run is an error, never silently reused). The delivery archive is
//! first written under a hidden `.partial` name and renamed into place only
//! after the tar stream and the gzip encoder both finished cleanly, so an
//! aborted run cannot leave a plausible-looking archive behind.

use crate::error::{PackageError, Result};
use crate::product::PlannedProduct;
use aipack_common::DeliveryName;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The staging directory of one delivery run.
#[derive(Debug)]
pub struct Staging {
    root: PathBuf,
}

impl Staging {
    /// Create `{output_dir}/{delivery_name}`, failing if it already exists.
    pub fn create(output_dir: &Path, delivery: &DeliveryName) -> Result<Self> {
        fs::create_dir_all(output_dir)?;
        let root = output_dir.join(delivery.as_str());
        match fs::create_dir(&root) {
            Ok(()) => {
                debug!(staging = %root.display(), "staging directory created");
                Ok(Staging { root })
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                Err(PackageError::StagingExists { path: root })
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a file directly under the staging root.
    pub fn file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Copy one product's label and referenced data files to its planned
    /// archive path. Destination directories are created idempotently.
    pub fn stage_product(&self, product: &PlannedProduct) -> Result<()> {
        let dest_label = self.root.join(&product.archive_path);
        let dest_dir = dest_label
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        fs::create_dir_all(&dest_dir)?;

        copy_file(&product.record.label_path, &dest_label)?;
        for file in &product.record.referenced_files {
            let src = product.record.label_dir().join(file);
            copy_file(&src, &dest_dir.join(file))?;
        }
        Ok(())
    }

    /// Delete the staging tree.
    pub fn remove(self) -> Result<()> {
        fs::remove_dir_all(&self.root)?;
        Ok(())
    }
}

fn copy_file(from: &Path, to: &Path) -> Result<()> {
    fs::copy(from, to).map_err(|source| PackageError::CopyFailed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Compress the staging tree into `{output_dir}/{delivery}.tar.gz`.
///
/// The archive's internal root entry is the staging directory's base name.
pub fn write_archive(
    staging: &Staging,
    output_dir: &Path,
    delivery: &DeliveryName,
) -> Result<PathBuf> {
    let archive_path = output_dir.join(delivery.archive_file());
    let partial_path = output_dir.join(format!(".{}.partial", delivery.archive_file()));

    {
        let file = File::create(&partial_path)?;
        let encoder = GzEncoder::new(file, Compression::default());
        let mut tar = tar::Builder::new(encoder);
        tar.append_dir_all(delivery.as_str(), staging.root())?;
        let encoder = tar.into_inner()?;
        encoder.finish()?;
    }

    fs::rename(&partial_path, &archive_path)?;
    info!(archive = %archive_path.display(), "delivery archive written");
    Ok(archive_path)
}
