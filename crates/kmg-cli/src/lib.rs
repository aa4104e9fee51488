//! # kmg-cli — Manifest Guard Command Line
//!
//! Provides the `kmg` command-line interface.
//!
//! ## Subcommands
//!
//! - `kmg scan`: run every check listed in a check file.
//! - `kmg resource-limit`: one resource-limit check configured by flags.
//! - `kmg annotation`: one missing-annotation check configured by flags.
//!
//! ```bash
//! kmg scan --config checks.yaml deploy/
//! kmg resource-limit --type limits --resource memory --max 2Gi pod.yaml
//! kmg annotation --name mycompany.io/annotation --value 'value.*' deploy/
//! ```
//!
//! ## Exit Codes
//!
//! `0` when nothing was found, `1` when there are findings, `2` when a file
//! could not be scanned or the command itself failed.

pub mod annotation;
pub mod resource_limit;
pub mod scan;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::ValueEnum;

use kmg_checks::{Check, OutputFormat, Scanner};

/// Report format selected on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

/// Scan `paths` with `checks`, print the report, and return the exit code.
pub fn run_checks(checks: Vec<Check>, paths: &[PathBuf], format: Format) -> Result<u8> {
    let report = Scanner::new(checks).scan_paths(paths);
    let rendered = OutputFormat::from(format)
        .render(&report)
        .context("failed to render report")?;
    print!("{rendered}");
    if format == Format::Json {
        println!();
    }
    Ok(report.exit_code())
}
