//! Fixed names and kernel paths.

/// Subdirectory of the target root that receives the host `/dev`.
pub const DEV_DIR: &str = "dev";

/// Subdirectory of the target root that receives the host `/proc`.
pub const PROC_DIR: &str = "proc";

/// Subdirectory of the target root that receives the host `/sys`.
pub const SYS_DIR: &str = "sys";

/// Optional subdirectory of the target root that receives the host `/`.
pub const PARENT_ROOT_DIR: &str = "parent_root";

/// Pseudo-filesystems bound into every target root, in mount order.
pub const ESSENTIAL_MOUNTS: [(&str, &str); 3] = [
    ("/dev", DEV_DIR),
    ("/proc", PROC_DIR),
    ("/sys", SYS_DIR),
];

/// Per-process uid mapping record.
pub const UID_MAP_PATH: &str = "/proc/self/uid_map";

/// Per-process gid mapping record.
pub const GID_MAP_PATH: &str = "/proc/self/gid_map";

/// Per-process `setgroups(2)` policy record.
pub const SETGROUPS_PATH: &str = "/proc/self/setgroups";

/// Value written to [`SETGROUPS_PATH`] before the gid map.
pub const SETGROUPS_DENY: &str = "deny";

/// Operator hint shown when the kernel refuses an unprivileged user namespace.
pub const USERNS_SYSCTL_HINT: &str = "check sysctl kernel.unprivileged_userns_clone = 1";

/// Host files copied into the root by `--copy-dns`.
pub const DNS_HOST_FILES: [&str; 2] = ["/etc/resolv.conf", "/etc/hosts"];

/// Binary name for the CLI.
pub const BIN_NAME: &str = "schroot";
