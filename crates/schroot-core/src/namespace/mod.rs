//! Linux namespace management for unprivileged launches.
//!
//! Only the user and mount namespaces are created, together, by a single
//! `unshare(2)` call.

pub mod user;
