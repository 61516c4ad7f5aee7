//! Command-line definition.

use std::path::PathBuf;

use clap::Parser;
use schroot_common::config::{IsolationMode, LaunchConfig};
use schroot_common::constants::DNS_HOST_FILES;

/// Enter a prepared root directory and exec a program inside it.
///
/// The root must contain `dev`, `proc` and `sys` directories; an optional
/// `parent_root` directory receives the host `/`.
#[derive(Parser, Debug)]
#[command(name = schroot_common::constants::BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Directory that becomes the new root.
    pub root: PathBuf,

    /// Program to run inside the root (looked up in `PATH`), followed by
    /// its arguments, passed through unchanged.
    #[arg(trailing_var_arg = true, required = true, allow_hyphen_values = true)]
    pub command: Vec<String>,

    /// Isolation mode: privileged, unprivileged, or auto (by invoking uid).
    #[arg(long, env = "SCHROOT_MODE", default_value = "auto")]
    pub mode: IsolationMode,

    /// Do not bind the host root onto `parent_root`.
    #[arg(long)]
    pub no_parent_root: bool,

    /// Copy a host file to the same path inside the root before entering it.
    #[arg(long = "copy-host-file", value_name = "PATH")]
    pub host_files: Vec<PathBuf>,

    /// Copy `/etc/resolv.conf` and `/etc/hosts` into the root.
    #[arg(long)]
    pub copy_dns: bool,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Converts parsed arguments into a launch configuration.
    pub fn into_config(self) -> LaunchConfig {
        let mut host_files = self.host_files;
        if self.copy_dns {
            host_files.extend(DNS_HOST_FILES.iter().map(PathBuf::from));
        }
        let mut command = self.command.into_iter();
        let program = command.next().unwrap_or_default();
        LaunchConfig {
            root: self.root,
            program,
            args: command.collect(),
            mode: self.mode,
            expose_parent_root: !self.no_parent_root,
            host_files,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    fn parse(args: &[&str]) -> LaunchConfig {
        Cli::try_parse_from(args).expect("parse").into_config()
    }

    #[test]
    fn positional_surface() {
        let config = parse(&["schroot", "/tmp/sandbox", "/bin/echo", "hello"]);
        assert_eq!(config.root, PathBuf::from("/tmp/sandbox"));
        assert_eq!(config.program, "/bin/echo");
        assert_eq!(config.args, ["hello"]);
        assert!(config.expose_parent_root);
        assert!(config.host_files.is_empty());
    }

    #[test]
    fn program_flags_pass_through() {
        let config = parse(&["schroot", "/srv/root", "sh", "-c", "echo --mode"]);
        assert_eq!(config.program, "sh");
        assert_eq!(config.args, ["-c", "echo --mode"]);
    }

    #[test]
    fn options_before_root() {
        let config = parse(&[
            "schroot",
            "--mode",
            "unprivileged",
            "--no-parent-root",
            "--copy-dns",
            "/srv/root",
            "/bin/true",
        ]);
        assert_eq!(config.mode, IsolationMode::Unprivileged);
        assert!(!config.expose_parent_root);
        assert_eq!(
            config.host_files,
            [PathBuf::from("/etc/resolv.conf"), PathBuf::from("/etc/hosts")]
        );
    }

    #[test]
    fn schroot_flags_after_program_belong_to_the_program() {
        let config = parse(&["schroot", "/srv/root", "/bin/prog", "--no-parent-root"]);
        assert_eq!(config.program, "/bin/prog");
        assert_eq!(config.args, ["--no-parent-root"]);
        assert!(config.expose_parent_root);

        let config = parse(&["schroot", "/srv/root", "prog", "--mode", "x", "--copy-dns"]);
        assert_eq!(config.args, ["--mode", "x", "--copy-dns"]);
        assert!(config.host_files.is_empty());
    }

    #[test]
    fn help_and_version_after_program_are_passed_through() {
        let config = parse(&["schroot", "/srv/root", "/bin/ls", "-V"]);
        assert_eq!(config.program, "/bin/ls");
        assert_eq!(config.args, ["-V"]);

        let config = parse(&["schroot", "/srv/root", "/bin/ls", "--help"]);
        assert_eq!(config.args, ["--help"]);
    }

    #[test]
    fn program_is_required() {
        assert!(Cli::try_parse_from(["schroot", "/srv/root"]).is_err());
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(Cli::try_parse_from(["schroot", "--mode", "rootless", "/r", "/bin/true"]).is_err());
    }
}
