//! # schroot
//!
//! Enters a prepared filesystem root, inside a fresh user and mount
//! namespace when unprivileged, and replaces itself with the target program.

mod cli;

use clap::Parser;
use schroot_core::kernel::LinuxKernel;
use schroot_core::launch::launch;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr: stdout belongs to the target program.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.into_config();
    match launch(&mut LinuxKernel::new(), &config) {
        Ok(never) => match never {},
        Err(e) => {
            let stage = e.stage();
            tracing::debug!(stage, error = %e, "launch aborted");
            Err(anyhow::Error::new(e).context(format!("{stage} step failed")))
        }
    }
}
