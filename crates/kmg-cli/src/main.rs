//! # kmg CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kmg_cli::annotation::{run_annotation, AnnotationArgs};
use kmg_cli::resource_limit::{run_resource_limit, ResourceLimitArgs};
use kmg_cli::scan::{run_scan, ScanArgs};
use kmg_cli::Format;

/// Manifest Guard
///
/// Finds Kubernetes manifests whose resource quantities exceed a maximum,
/// and manifests missing a required annotation.
#[derive(Parser, Debug)]
#[command(name = "kmg", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Report format.
    #[arg(long, value_enum, default_value = "text", global = true)]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the checks listed in a check file.
    Scan(ScanArgs),

    /// Flag container resource quantities above a maximum.
    ResourceLimit(ResourceLimitArgs),

    /// Flag metadata missing an annotation, or with a value not matching a glob.
    Annotation(AnnotationArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("kmg v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match cli.command {
        Commands::Scan(args) => run_scan(&args, cli.format),
        Commands::ResourceLimit(args) => run_resource_limit(&args, cli.format),
        Commands::Annotation(args) => run_annotation(&args, cli.format),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
