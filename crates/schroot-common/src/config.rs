//! Launch configuration handed from the CLI to the core.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Result, SchrootError};

/// How the launcher obtains the rights to mount and chroot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IsolationMode {
    /// The caller already holds the required privileges.
    Privileged,
    /// Create a user and mount namespace and map the caller to root inside it.
    Unprivileged,
    /// Privileged when invoked as uid 0, unprivileged otherwise.
    #[default]
    Auto,
}

impl IsolationMode {
    /// Resolves [`IsolationMode::Auto`] against the invoking host uid.
    ///
    /// Explicit modes are returned unchanged.
    #[must_use]
    pub const fn resolve(self, host_uid: u32) -> Self {
        match self {
            Self::Auto if host_uid == 0 => Self::Privileged,
            Self::Auto => Self::Unprivileged,
            explicit => explicit,
        }
    }
}

impl fmt::Display for IsolationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Privileged => write!(f, "privileged"),
            Self::Unprivileged => write!(f, "unprivileged"),
            Self::Auto => write!(f, "auto"),
        }
    }
}

impl FromStr for IsolationMode {
    type Err = SchrootError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "privileged" => Ok(Self::Privileged),
            "unprivileged" => Ok(Self::Unprivileged),
            "auto" => Ok(Self::Auto),
            other => Err(SchrootError::Config {
                message: format!(
                    "unknown isolation mode {other:?} (expected privileged, unprivileged or auto)"
                ),
            }),
        }
    }
}

/// Everything the launcher needs to enter a root and exec a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    /// Directory that becomes the new filesystem root.
    pub root: PathBuf,
    /// Program to exec inside the root, resolved through `PATH`.
    pub program: String,
    /// Arguments passed to the program, excluding `argv[0]`.
    pub args: Vec<String>,
    /// Requested isolation mode.
    pub mode: IsolationMode,
    /// Bind the host `/` onto `parent_root` when that directory exists.
    pub expose_parent_root: bool,
    /// Host files copied to the same path under the root before entering it.
    pub host_files: Vec<PathBuf>,
}

impl LaunchConfig {
    /// Creates a configuration with default options.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            root: root.into(),
            program: program.into(),
            args,
            mode: IsolationMode::default(),
            expose_parent_root: true,
            host_files: Vec::new(),
        }
    }

    /// Checks that the configuration can be handed to the kernel.
    ///
    /// # Errors
    ///
    /// Returns [`SchrootError::Config`] for an empty root or program, and
    /// [`SchrootError::InvalidArgument`] for strings with interior NUL bytes.
    pub fn validate(&self) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            return Err(SchrootError::Config {
                message: "target root path is empty".into(),
            });
        }
        if self.program.is_empty() {
            return Err(SchrootError::Config {
                message: "target program is empty".into(),
            });
        }
        for value in std::iter::once(&self.program).chain(&self.args) {
            if value.contains('\0') {
                return Err(SchrootError::InvalidArgument {
                    value: value.clone(),
                    message: "contains an interior NUL byte",
                });
            }
        }
        for file in &self.host_files {
            if !file.is_absolute() {
                return Err(SchrootError::Config {
                    message: format!("host file {} must be an absolute path", file.display()),
                });
            }
        }
        Ok(())
    }
}
