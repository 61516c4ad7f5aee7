//! Directory checks run before every mount and before entering the root.
//!
//! Metadata is queried fresh on each call: earlier mounts may change what a
//! path refers to, so results are never cached.

use std::io::ErrorKind;
use std::path::Path;

use schroot_common::error::{Result, SchrootError};

/// Confirms that `path` currently refers to a directory.
///
/// Symlinks are followed, like `stat(2)`.
///
/// # Errors
///
/// Returns [`SchrootError::NotADirectory`] if the path is missing or is not a
/// directory, and [`SchrootError::Metadata`] if its metadata cannot be read.
pub fn ensure_directory(path: &Path) -> Result<()> {
    if probe_directory(path)? {
        Ok(())
    } else {
        Err(SchrootError::NotADirectory {
            path: path.to_path_buf(),
        })
    }
}

/// Reports whether `path` currently refers to a directory.
///
/// A missing path is `Ok(false)`, so optional mount points can be skipped.
///
/// # Errors
///
/// Returns [`SchrootError::Metadata`] for any metadata failure other than
/// the path not existing.
pub fn probe_directory(path: &Path) -> Result<bool> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(meta.is_dir()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(SchrootError::Metadata {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
