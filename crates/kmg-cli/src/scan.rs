//! # Scan Subcommand
//!
//! Runs the checks listed in a check file over manifests.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use kmg_checks::ChecksFile;

use crate::Format;

/// Arguments for the `kmg scan` subcommand.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Check file listing the checks to run.
    #[arg(long, short = 'c', value_name = "FILE")]
    pub config: PathBuf,

    /// Manifest files or directories to scan.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,
}

/// Execute the scan subcommand.
pub fn run_scan(args: &ScanArgs, format: Format) -> Result<u8> {
    let file = ChecksFile::load(&args.config)?;
    let checks = file
        .build()
        .with_context(|| format!("invalid check in {}", args.config.display()))?;
    tracing::info!(checks = checks.len(), config = %args.config.display(), "loaded checks");
    crate::run_checks(checks, &args.paths, format)
}
