//! # schroot-core
//!
//! Low-level Linux primitives for entering a prepared filesystem root.
//!
//! This crate provides safe abstractions over:
//! - **Filesystem**: directory validation, recursive bind mounts, root
//!   preparation, and the `chroot` + `exec` hand-off.
//! - **Namespaces**: user + mount namespace creation with a one-to-one
//!   identity mapping of the invoking user to root.
//! - **Launch**: the fixed, fail-fast sequence tying the above together.
//!
//! Every kernel interaction goes through the [`kernel::Kernel`] trait so the
//! sequence can be exercised without privileges.

pub mod filesystem;
pub mod kernel;
pub mod launch;
pub mod namespace;
