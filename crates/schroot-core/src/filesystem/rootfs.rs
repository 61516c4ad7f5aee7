//! Population of the target root before entering it.
//!
//! `/dev`, `/proc` and `/sys` are bound into the root in that order. The
//! host `/` is then bound onto `parent_root` when that directory exists,
//! as a recovery aid. This assumes `/etc` lives on the same volume as `/`;
//! separately mounted volumes are reachable only through the recursive bind.

use std::io;
use std::path::{Path, PathBuf};

use nix::fcntl::OFlag;

use schroot_common::constants::{ESSENTIAL_MOUNTS, PARENT_ROOT_DIR};
use schroot_common::error::{Result, SchrootError};

use super::mount::bind_mount;
use super::validate::{ensure_directory, probe_directory};
use crate::kernel::Kernel;

/// Absolute, validated path of the directory that becomes the new root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRoot {
    path: PathBuf,
}

impl TargetRoot {
    /// Validates `path` as a directory and resolves it to an absolute path.
    ///
    /// Relative paths are resolved against the current working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a directory or cannot be resolved.
    pub fn open(path: &Path) -> Result<Self> {
        ensure_directory(path)?;
        let path = std::fs::canonicalize(path).map_err(|e| SchrootError::Metadata {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self { path })
    }

    /// Returns the absolute root path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the absolute path of `name` inside the root.
    #[must_use]
    pub fn child(&self, name: impl AsRef<Path>) -> PathBuf {
        self.path.join(name)
    }

    /// Checks that every essential mount point exists before anything is
    /// changed, so a malformed root is rejected up front.
    ///
    /// # Errors
    ///
    /// Returns [`SchrootError::NotADirectory`] naming the first missing entry.
    pub fn preflight(&self) -> Result<()> {
        for (_, name) in ESSENTIAL_MOUNTS {
            ensure_directory(&self.child(name))?;
        }
        tracing::debug!(root = %self.path.display(), "root layout checked");
        Ok(())
    }
}

/// Binds the essential pseudo-filesystems and, optionally, the host root
/// into `root`.
///
/// Each mount is fatal on failure. The `parent_root` step is skipped
/// silently when the directory is absent or `expose_parent_root` is false.
///
/// # Errors
///
/// Returns an error if a mount target is invalid or a mount fails.
pub fn prepare_root<K: Kernel>(
    kernel: &mut K,
    root: &TargetRoot,
    expose_parent_root: bool,
) -> Result<()> {
    for (source, name) in ESSENTIAL_MOUNTS {
        bind_mount(kernel, Path::new(source), &root.child(name))?;
    }

    let parent_root = root.child(PARENT_ROOT_DIR);
    let parent_root_exposed = expose_parent_root && probe_directory(&parent_root)?;
    if parent_root_exposed {
        bind_mount(kernel, Path::new("/"), &parent_root)?;
    } else {
        tracing::debug!(path = %parent_root.display(), "parent root not exposed");
    }

    tracing::info!(root = %root.path().display(), parent_root_exposed, "root prepared");
    Ok(())
}

/// Copies host files to the same absolute location under `root`.
///
/// Best-effort: a file that cannot be copied is logged and skipped. The
/// destination directory must already exist inside the root. Symlinks in the
/// destination are never followed out of the root. Returns the number of
/// files copied.
pub fn seed_host_files(root: &TargetRoot, files: &[PathBuf]) -> usize {
    let mut copied = 0;
    for file in files {
        match copy_into_root(root, file) {
            Ok((destination, bytes)) => {
                copied += 1;
                tracing::debug!(
                    file = %file.display(),
                    destination = %destination.display(),
                    bytes,
                    "host file copied"
                );
            }
            Err(e) => tracing::warn!(
                file = %file.display(),
                root = %root.path().display(),
                error = %e,
                "host file not copied"
            ),
        }
    }
    copied
}

/// Copies `file` to its mirror path under `root`.
///
/// The destination directory is resolved and must stay inside the root; the
/// destination itself is opened with `O_NOFOLLOW`.
fn copy_into_root(root: &TargetRoot, file: &Path) -> io::Result<(PathBuf, u64)> {
    use std::os::unix::fs::OpenOptionsExt;

    let relative = file
        .strip_prefix("/")
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "host file is not absolute"))?;
    let name = relative
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "host file has no name"))?;
    let parent = root.child(relative.parent().unwrap_or_else(|| Path::new("")));
    let parent = std::fs::canonicalize(parent)?;
    if !parent.starts_with(root.path()) {
        return Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            format!("destination directory {} escapes the root", parent.display()),
        ));
    }

    let destination = parent.join(name);
    let mut source = std::fs::File::open(file)?;
    let mut target = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .custom_flags(OFlag::O_NOFOLLOW.bits())
        .open(&destination)?;
    let bytes = io::copy(&mut source, &mut target)?;
    Ok((destination, bytes))
}
