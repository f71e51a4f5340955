//! Delivery package building for aipack.
//!
//! This crate turns a validated, path-planned product set into the artifacts
//! of one AIP delivery:
//! - `transfer`: the fixed-width transfer manifest and its
//!   [`TransferFields`] geometry
//! - `manifest`: the MD5 checksum manifest and per-manifest statistics
//! - `descriptor`: the `Product_AIP` descriptor label, filled from a
//!   template
//! - `assemble`: the staging tree and the final `tar.gz` archive
//!
//! # Offset agreement
//!
//! The transfer manifest's field offsets and the descriptor's record
//! geometry are the same [`TransferFields`] value, computed once by the
//! manifest writer and handed to the descriptor filler — the two artifacts
//! cannot drift apart.

pub mod assemble;
pub mod checksum;
pub mod descriptor;
pub mod error;
pub mod manifest;
pub mod product;
pub mod transfer;

pub use assemble::{write_archive, Staging};
pub use checksum::{md5_bytes, md5_file, md5_files};
pub use descriptor::{render_descriptor, write_descriptor, DescriptorSpec, GENERATOR_TAG};
pub use error::{PackageError, Result};
pub use manifest::{write_checksum_manifest, ManifestInfo};
pub use product::PlannedProduct;
pub use transfer::{write_transfer_manifest, TransferFields};
