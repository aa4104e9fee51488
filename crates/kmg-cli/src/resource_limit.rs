//! # Resource Limit Subcommand
//!
//! A single resource-limit check configured from flags, for quick use
//! without a check file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use kmg_checks::{Check, ResourceLimitCheck, ResourceLimitConfig, ResourceValueType};
use kmg_core::UnitFamily;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueTypeArg {
    Limits,
    Requests,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceArg {
    Cpu,
    Memory,
}

/// Arguments for the `kmg resource-limit` subcommand.
#[derive(Args, Debug)]
pub struct ResourceLimitArgs {
    /// Which block of `resources` to check.
    #[arg(long = "type", value_enum, default_value = "limits")]
    pub value_type: ValueTypeArg,

    /// Which resource to check.
    #[arg(long, value_enum)]
    pub resource: ResourceArg,

    /// Largest accepted quantity, e.g. 2Gi or 500m.
    #[arg(long, value_name = "QUANTITY")]
    pub max: String,

    /// Manifest files or directories to scan.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,
}

impl ResourceLimitArgs {
    fn config(&self) -> ResourceLimitConfig {
        ResourceLimitConfig {
            resource_value_type: match self.value_type {
                ValueTypeArg::Limits => ResourceValueType::Limits,
                ValueTypeArg::Requests => ResourceValueType::Requests,
            },
            resource_type: match self.resource {
                ResourceArg::Cpu => UnitFamily::Cpu,
                ResourceArg::Memory => UnitFamily::Memory,
            },
            resource_limit: self.max.clone(),
        }
    }
}

/// Execute the resource-limit subcommand.
pub fn run_resource_limit(args: &ResourceLimitArgs, format: crate::Format) -> Result<u8> {
    let check = ResourceLimitCheck::new(args.config()).context("invalid --max")?;
    crate::run_checks(vec![Check::from(check)], &args.paths, format)
}
