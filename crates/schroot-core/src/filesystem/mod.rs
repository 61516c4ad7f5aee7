//! Filesystem preparation for the target root.
//!
//! Provides directory validation, recursive bind mounts, population of the
//! target root, and the final `chroot` + `exec` hand-off.

pub mod mount;
pub mod rootfs;
pub mod transition;
pub mod validate;
