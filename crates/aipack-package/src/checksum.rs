//! MD5 content hashing for manifest rows.
//!
//! Files are streamed in fixed-size blocks to bound memory on large data
//! products. Hashing of independent files runs on a rayon parallel iterator;
//! collection preserves input order, which the checksum manifest requires.

use crate::error::{PackageError, Result};
use md5::{Digest, Md5};
use rayon::prelude::*;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Read block size for streaming hashes.
const BLOCK_SIZE: usize = 64 * 1024;

/// MD5 of a file's contents as lowercase hex.
pub fn md5_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|source| PackageError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let mut hasher = Md5::new();
    let mut buf = [0u8; BLOCK_SIZE];
    loop {
        let n = file.read(&mut buf).map_err(|source| PackageError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// MD5 of an in-memory buffer as lowercase hex.
pub fn md5_bytes(data: &[u8]) -> String {
    hex::encode(Md5::digest(data))
}

/// Hash many files concurrently, returning digests in input order.
pub fn md5_files(paths: &[PathBuf]) -> Result<Vec<String>> {
    paths.par_iter().map(|path| md5_file(path)).collect()
}
