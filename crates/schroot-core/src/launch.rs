//! The launch sequence: namespace, mounts, chroot, exec.
//!
//! Every step is a precondition for the next and none is undone. The first
//! error aborts the whole sequence; mounts made so far belong to the
//! process's mount namespace and are reclaimed when it exits.

use std::convert::Infallible;

use schroot_common::config::{IsolationMode, LaunchConfig};
use schroot_common::error::Result;

use crate::filesystem::rootfs::{TargetRoot, prepare_root, seed_host_files};
use crate::filesystem::transition::{ExecTarget, enter_root, exec_target};
use crate::kernel::Kernel;
use crate::namespace::user::enter_user_namespace;

/// Prepares the root described by `config`, enters it, and execs the program.
///
/// Order:
/// 1. validate the configuration and the root layout
/// 2. copy requested host files into the root
/// 3. unprivileged mode only: create the namespaces and map the caller to root
/// 4. `chdir` into the root
/// 5. bind `dev`, `proc`, `sys`, then `parent_root` if present
/// 6. `chroot` and `exec`
///
/// # Errors
///
/// Only returns on failure; on success the process image is replaced.
pub fn launch<K: Kernel>(kernel: &mut K, config: &LaunchConfig) -> Result<Infallible> {
    config.validate()?;
    let target = ExecTarget::new(&config.program, &config.args)?;

    let identity = kernel.host_identity();
    let mode = config.mode.resolve(identity.uid);
    tracing::info!(
        root = %config.root.display(),
        program = %config.program,
        %mode,
        "launching"
    );

    let root = TargetRoot::open(&config.root)?;
    root.preflight()?;

    if !config.host_files.is_empty() {
        let copied = seed_host_files(&root, &config.host_files);
        tracing::debug!(copied, requested = config.host_files.len(), "host files seeded");
    }

    if mode == IsolationMode::Unprivileged {
        enter_user_namespace(kernel, identity)?;
    }

    kernel.chdir(root.path())?;
    prepare_root(kernel, &root, config.expose_parent_root)?;
    enter_root(kernel, &root)?;
    exec_target(kernel, &target)
}
