//! Unified error type for the schroot workspace.
//!
//! Every variant is terminal: the launcher never retries or rolls back,
//! it reports the failure and exits.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum SchrootError {
    /// A mount target or root path is missing or not a directory.
    #[error("{path} is not a directory (or not found)")]
    NotADirectory {
        /// Offending path.
        path: PathBuf,
    },

    /// The metadata of a path could not be queried.
    #[error("stat error on {path}: {source}")]
    Metadata {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The kernel rejected a bind mount.
    #[error("bind mount of {source_path} onto {target} failed: {source}")]
    Mount {
        /// Directory being exposed.
        source_path: PathBuf,
        /// Mount point inside the target root.
        target: PathBuf,
        /// Underlying syscall error.
        source: std::io::Error,
    },

    /// The kernel refused to create the user and mount namespaces.
    #[error("user namespace creation rejected ({hint}): {source}")]
    Namespace {
        /// Operator-facing remediation hint.
        hint: &'static str,
        /// Underlying syscall error.
        source: std::io::Error,
    },

    /// Writing an identity mapping record failed.
    #[error("identity mapping write to {path} failed: {source}")]
    IdentityMap {
        /// Mapping record that was being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Changing the working directory failed.
    #[error("chdir to {path} failed: {source}")]
    Chdir {
        /// Requested working directory.
        path: PathBuf,
        /// Underlying syscall error.
        source: std::io::Error,
    },

    /// Changing the process root failed.
    #[error("chroot to {path} failed: {source}")]
    Chroot {
        /// Requested root.
        path: PathBuf,
        /// Underlying syscall error.
        source: std::io::Error,
    },

    /// Replacing the process image failed.
    #[error("exec of {program} failed: {source}")]
    Exec {
        /// Program that was looked up.
        program: String,
        /// Underlying syscall error.
        source: std::io::Error,
    },

    /// A program name or argument cannot be passed to the kernel.
    #[error("invalid argument {value:?}: {message}")]
    InvalidArgument {
        /// Rejected value.
        value: String,
        /// Why it was rejected.
        message: &'static str,
    },

    /// A configuration value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid configuration.
        message: String,
    },
}

impl SchrootError {
    /// Short name of the launch stage that produced the error.
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::NotADirectory { .. } | Self::Metadata { .. } => "validation",
            Self::Mount { .. } => "mount",
            Self::Namespace { .. } => "namespace",
            Self::IdentityMap { .. } => "identity-map",
            Self::Chdir { .. } | Self::Chroot { .. } | Self::Exec { .. } => "transition",
            Self::InvalidArgument { .. } | Self::Config { .. } => "config",
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, SchrootError>;
