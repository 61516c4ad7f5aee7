//! # schroot-common
//!
//! Shared error definitions, launch configuration, and constants used
//! across the schroot workspace.
//!
//! This crate is the leaf of the dependency graph. It knows nothing about
//! the kernel and provides the vocabulary the other crates speak.

pub mod config;
pub mod constants;
pub mod error;
