//! User namespace creation and identity mapping.
//!
//! Maps the invoking host user and group to uid/gid 0 inside a fresh user
//! namespace, so the process can mount and chroot without host privileges.
//! The sequence is irreversible and runs at most once per process:
//!
//! 1. `unshare(CLONE_NEWUSER | CLONE_NEWNS)`
//! 2. `deny` to `/proc/self/setgroups`
//! 3. `0 <uid> 1` to `/proc/self/uid_map`
//! 4. `0 <gid> 1` to `/proc/self/gid_map`
//!
//! `setgroups` must be denied before the gid map is written, otherwise an
//! unprivileged process could drop supplementary groups used as deny lists.

use std::fmt;
use std::path::Path;

use schroot_common::constants::{GID_MAP_PATH, SETGROUPS_DENY, SETGROUPS_PATH, UID_MAP_PATH};
use schroot_common::error::Result;

use crate::kernel::Kernel;

/// Host uid/gid of the invoking process.
///
/// Must be captured before `unshare(2)`: until the maps are written, the
/// kernel reports the overflow id inside the new namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessIdentity {
    /// Host user id.
    pub uid: u32,
    /// Host group id.
    pub gid: u32,
}

/// One line of a `uid_map` or `gid_map` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdMapping {
    /// First id inside the namespace.
    pub inside: u32,
    /// First id on the host.
    pub outside: u32,
    /// Number of consecutive ids mapped.
    pub count: u32,
}

impl IdMapping {
    /// Maps a single host id to root inside the namespace.
    #[must_use]
    pub const fn root(host_id: u32) -> Self {
        Self {
            inside: 0,
            outside: host_id,
            count: 1,
        }
    }
}

impl fmt::Display for IdMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {} {}", self.inside, self.outside, self.count)
    }
}

/// Creates the user and mount namespaces and maps `identity` to root.
///
/// If `unshare(2)` is rejected nothing is written. Each write is fatal and
/// nothing is rolled back.
///
/// # Errors
///
/// Returns [`SchrootError::Namespace`](schroot_common::error::SchrootError::Namespace)
/// if the namespaces cannot be created, or
/// [`SchrootError::IdentityMap`](schroot_common::error::SchrootError::IdentityMap)
/// if a mapping record is rejected.
pub fn enter_user_namespace<K: Kernel>(kernel: &mut K, identity: ProcessIdentity) -> Result<()> {
    kernel.unshare_user_and_mount()?;
    tracing::debug!("user and mount namespaces created");

    kernel.write_identity_record(Path::new(SETGROUPS_PATH), SETGROUPS_DENY)?;
    kernel.write_identity_record(
        Path::new(UID_MAP_PATH),
        &IdMapping::root(identity.uid).to_string(),
    )?;
    kernel.write_identity_record(
        Path::new(GID_MAP_PATH),
        &IdMapping::root(identity.gid).to_string(),
    )?;

    tracing::info!(
        host_uid = identity.uid,
        host_gid = identity.gid,
        "mapped caller to root in user namespace"
    );
    Ok(())
}
