//! Recursive bind mounts onto validated targets.

use std::path::Path;

use schroot_common::error::Result;

use super::validate::ensure_directory;
use crate::kernel::Kernel;

/// Recursively bind-mounts `source` onto `target`.
///
/// The target is validated immediately before the mount. Nothing is undone
/// on failure; the caller is expected to abort.
///
/// # Errors
///
/// Returns an error if the target is not a directory or if `mount(2)` fails.
pub fn bind_mount<K: Kernel>(kernel: &mut K, source: &Path, target: &Path) -> Result<()> {
    ensure_directory(target)?;
    kernel.bind_mount(source, target)?;
    tracing::debug!(
        source = %source.display(),
        target = %target.display(),
        "bind mount created"
    );
    Ok(())
}
