//! Entering the prepared root and handing off to the target program.

use std::convert::Infallible;
use std::ffi::CString;
use std::path::Path;

use schroot_common::error::{Result, SchrootError};

use super::rootfs::TargetRoot;
use crate::kernel::Kernel;

/// Program and argument vector, converted for `execvp(3)` up front so that
/// nothing can fail on conversion after the root has changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecTarget {
    program: CString,
    argv: Vec<CString>,
}

impl ExecTarget {
    /// Builds the exec target. `argv[0]` is the program name as given.
    ///
    /// # Errors
    ///
    /// Returns [`SchrootError::InvalidArgument`] if any string contains a NUL byte.
    pub fn new(program: &str, args: &[String]) -> Result<Self> {
        let program = to_cstring(program)?;
        let argv = std::iter::once(Ok(program.clone()))
            .chain(args.iter().map(|arg| to_cstring(arg)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { program, argv })
    }

    /// Returns the full argument vector, including `argv[0]`.
    #[must_use]
    pub fn argv(&self) -> &[CString] {
        &self.argv
    }
}

fn to_cstring(value: &str) -> Result<CString> {
    CString::new(value).map_err(|_| SchrootError::InvalidArgument {
        value: value.to_string(),
        message: "contains an interior NUL byte",
    })
}

/// Makes `root` the process root.
///
/// The working directory is expected to be `root` already; it is reset to
/// the new `/` afterwards so it cannot point outside the root.
///
/// # Errors
///
/// Returns an error if `chroot(2)` or the following `chdir(2)` fails.
pub fn enter_root<K: Kernel>(kernel: &mut K, root: &TargetRoot) -> Result<()> {
    kernel.chroot(root.path())?;
    kernel.chdir(Path::new("/"))?;
    tracing::info!(root = %root.path().display(), "entered root");
    Ok(())
}

/// Replaces the current process with the target program.
///
/// # Errors
///
/// Only returns if `execvp(3)` fails.
pub fn exec_target<K: Kernel>(kernel: &mut K, target: &ExecTarget) -> Result<Infallible> {
    tracing::debug!(program = ?target.program, argc = target.argv.len(), "exec");
    kernel.exec(&target.program, &target.argv)
}
