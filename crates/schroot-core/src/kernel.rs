//! Kernel interface used by the launch sequence.
//!
//! [`LinuxKernel`] issues the real syscalls through `nix`. Tests substitute
//! a recording implementation to check ordering and fail-fast behavior.

use std::convert::Infallible;
use std::ffi::{CStr, CString};
use std::path::Path;

use schroot_common::error::Result;

use crate::namespace::user::ProcessIdentity;

/// Process-global kernel operations, in the order the launcher may need them.
pub trait Kernel {
    /// Returns the host uid/gid of the calling process.
    fn host_identity(&self) -> ProcessIdentity;

    /// Moves the calling process into a new user namespace and mount namespace.
    ///
    /// # Errors
    ///
    /// Returns [`SchrootError::Namespace`](schroot_common::error::SchrootError::Namespace)
    /// if `unshare(2)` is rejected.
    fn unshare_user_and_mount(&mut self) -> Result<()>;

    /// Writes a single record to a per-process identity file under `/proc/self`.
    ///
    /// # Errors
    ///
    /// Returns [`SchrootError::IdentityMap`](schroot_common::error::SchrootError::IdentityMap)
    /// if the write is rejected.
    fn write_identity_record(&mut self, path: &Path, record: &str) -> Result<()>;

    /// Recursively bind-mounts `source` onto `target`.
    ///
    /// # Errors
    ///
    /// Returns [`SchrootError::Mount`](schroot_common::error::SchrootError::Mount)
    /// if `mount(2)` fails.
    fn bind_mount(&mut self, source: &Path, target: &Path) -> Result<()>;

    /// Changes the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`SchrootError::Chdir`](schroot_common::error::SchrootError::Chdir)
    /// if `chdir(2)` fails.
    fn chdir(&mut self, path: &Path) -> Result<()>;

    /// Changes the process root directory.
    ///
    /// # Errors
    ///
    /// Returns [`SchrootError::Chroot`](schroot_common::error::SchrootError::Chroot)
    /// if `chroot(2)` fails.
    fn chroot(&mut self, path: &Path) -> Result<()>;

    /// Replaces the process image, searching `PATH` for `program`.
    ///
    /// Only returns on failure.
    ///
    /// # Errors
    ///
    /// Returns [`SchrootError::Exec`](schroot_common::error::SchrootError::Exec)
    /// if `execvp(3)` fails.
    fn exec(&mut self, program: &CStr, argv: &[CString]) -> Result<Infallible>;
}

/// [`Kernel`] backed by direct syscalls.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinuxKernel;

impl LinuxKernel {
    /// Creates a new syscall-backed kernel handle.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[cfg(target_os = "linux")]
impl Kernel for LinuxKernel {
    fn host_identity(&self) -> ProcessIdentity {
        ProcessIdentity {
            uid: nix::unistd::getuid().as_raw(),
            gid: nix::unistd::getgid().as_raw(),
        }
    }

    fn unshare_user_and_mount(&mut self) -> Result<()> {
        use nix::sched::{CloneFlags, unshare};
        use schroot_common::{constants::USERNS_SYSCTL_HINT, error::SchrootError};

        unshare(CloneFlags::CLONE_NEWUSER | CloneFlags::CLONE_NEWNS).map_err(|e| {
            SchrootError::Namespace {
                hint: USERNS_SYSCTL_HINT,
                source: e.into(),
            }
        })
    }

    fn write_identity_record(&mut self, path: &Path, record: &str) -> Result<()> {
        use schroot_common::error::SchrootError;

        std::fs::write(path, record).map_err(|e| SchrootError::IdentityMap {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn bind_mount(&mut self, source: &Path, target: &Path) -> Result<()> {
        use nix::mount::{MsFlags, mount};
        use schroot_common::error::SchrootError;

        mount(
            Some(source),
            target,
            None::<&str>,
            MsFlags::MS_BIND | MsFlags::MS_REC,
            None::<&str>,
        )
        .map_err(|e| SchrootError::Mount {
            source_path: source.to_path_buf(),
            target: target.to_path_buf(),
            source: e.into(),
        })
    }

    fn chdir(&mut self, path: &Path) -> Result<()> {
        use schroot_common::error::SchrootError;

        nix::unistd::chdir(path).map_err(|e| SchrootError::Chdir {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    fn chroot(&mut self, path: &Path) -> Result<()> {
        use schroot_common::error::SchrootError;

        nix::unistd::chroot(path).map_err(|e| SchrootError::Chroot {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    fn exec(&mut self, program: &CStr, argv: &[CString]) -> Result<Infallible> {
        use schroot_common::error::SchrootError;

        nix::unistd::execvp(program, argv).map_err(|e| SchrootError::Exec {
            program: program.to_string_lossy().into_owned(),
            source: e.into(),
        })
    }
}

/// Stub for non-Linux platforms.
///
/// Every operation fails: namespaces and bind mounts require Linux.
#[cfg(not(target_os = "linux"))]
impl Kernel for LinuxKernel {
    fn host_identity(&self) -> ProcessIdentity {
        ProcessIdentity { uid: 0, gid: 0 }
    }

    fn unshare_user_and_mount(&mut self) -> Result<()> {
        Err(unsupported())
    }

    fn write_identity_record(&mut self, _path: &Path, _record: &str) -> Result<()> {
        Err(unsupported())
    }

    fn bind_mount(&mut self, _source: &Path, _target: &Path) -> Result<()> {
        Err(unsupported())
    }

    fn chdir(&mut self, _path: &Path) -> Result<()> {
        Err(unsupported())
    }

    fn chroot(&mut self, _path: &Path) -> Result<()> {
        Err(unsupported())
    }

    fn exec(&mut self, _program: &CStr, _argv: &[CString]) -> Result<Infallible> {
        Err(unsupported())
    }
}

#[cfg(not(target_os = "linux"))]
fn unsupported() -> schroot_common::error::SchrootError {
    schroot_common::error::SchrootError::Config {
        message: "Linux required to enter a prepared root".into(),
    }
}
