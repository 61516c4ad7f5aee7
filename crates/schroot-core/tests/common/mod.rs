//! Recording kernel shared by the integration tests.

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::convert::Infallible;
use std::ffi::{CStr, CString};
use std::io;
use std::path::{Path, PathBuf};

use schroot_common::error::{Result, SchrootError};
use schroot_core::kernel::Kernel;
use schroot_core::namespace::user::ProcessIdentity;

/// A kernel operation observed by [`RecordingKernel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Unshare,
    WriteRecord { path: PathBuf, record: String },
    BindMount { source: PathBuf, target: PathBuf },
    Chdir(PathBuf),
    Chroot(PathBuf),
    Exec { program: String, argv: Vec<String> },
}

/// Kernel that records every call and never touches the system.
///
/// `exec` always fails with an `Exec` error after being recorded, so a
/// complete launch ends in `Err(SchrootError::Exec { .. })`.
pub struct RecordingKernel {
    pub identity: ProcessIdentity,
    pub calls: Vec<Call>,
    fail_when: Option<Box<dyn Fn(&Call) -> bool>>,
}

impl RecordingKernel {
    pub fn new(uid: u32, gid: u32) -> Self {
        Self {
            identity: ProcessIdentity { uid, gid },
            calls: Vec::new(),
            fail_when: None,
        }
    }

    /// Makes the first call matching `predicate` fail (and every later one).
    pub fn failing_when(mut self, predicate: impl Fn(&Call) -> bool + 'static) -> Self {
        self.fail_when = Some(Box::new(predicate));
        self
    }

    fn record(&mut self, call: Call) -> bool {
        let fail = self.fail_when.as_ref().is_some_and(|f| f(&call));
        self.calls.push(call);
        fail
    }

    pub fn mounts(&self) -> Vec<(PathBuf, PathBuf)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::BindMount { source, target } => Some((source.clone(), target.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn records(&self) -> Vec<(PathBuf, String)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::WriteRecord { path, record } => Some((path.clone(), record.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn position(&self, predicate: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls.iter().position(predicate)
    }
}

fn denied() -> io::Error {
    io::Error::from_raw_os_error(1)
}

impl Kernel for RecordingKernel {
    fn host_identity(&self) -> ProcessIdentity {
        self.identity
    }

    fn unshare_user_and_mount(&mut self) -> Result<()> {
        if self.record(Call::Unshare) {
            return Err(SchrootError::Namespace {
                hint: schroot_common::constants::USERNS_SYSCTL_HINT,
                source: denied(),
            });
        }
        Ok(())
    }

    fn write_identity_record(&mut self, path: &Path, record: &str) -> Result<()> {
        let call = Call::WriteRecord {
            path: path.to_path_buf(),
            record: record.to_string(),
        };
        if self.record(call) {
            return Err(SchrootError::IdentityMap {
                path: path.to_path_buf(),
                source: denied(),
            });
        }
        Ok(())
    }

    fn bind_mount(&mut self, source: &Path, target: &Path) -> Result<()> {
        let call = Call::BindMount {
            source: source.to_path_buf(),
            target: target.to_path_buf(),
        };
        if self.record(call) {
            return Err(SchrootError::Mount {
                source_path: source.to_path_buf(),
                target: target.to_path_buf(),
                source: denied(),
            });
        }
        Ok(())
    }

    fn chdir(&mut self, path: &Path) -> Result<()> {
        if self.record(Call::Chdir(path.to_path_buf())) {
            return Err(SchrootError::Chdir {
                path: path.to_path_buf(),
                source: denied(),
            });
        }
        Ok(())
    }

    fn chroot(&mut self, path: &Path) -> Result<()> {
        if self.record(Call::Chroot(path.to_path_buf())) {
            return Err(SchrootError::Chroot {
                path: path.to_path_buf(),
                source: denied(),
            });
        }
        Ok(())
    }

    fn exec(&mut self, program: &CStr, argv: &[CString]) -> Result<Infallible> {
        let program = program.to_string_lossy().into_owned();
        let _ = self.record(Call::Exec {
            program: program.clone(),
            argv: argv
                .iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect(),
        });
        Err(SchrootError::Exec {
            program,
            source: io::Error::other("exec intercepted by recording kernel"),
        })
    }
}

/// Creates a scratch root containing the given subdirectories.
pub fn sandbox(dirs: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    for name in dirs {
        std::fs::create_dir_all(dir.path().join(name)).expect("mkdir");
    }
    dir
}
