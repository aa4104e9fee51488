//! # kmg-checks — Manifest Policy Checks
//!
//! The two policies Manifest Guard enforces, and the plumbing to run them
//! over files.
//!
//! - **Resource limits** ([`resource`]): a container's `limits` or
//!   `requests` quantity for `cpu` or `memory` must not exceed a maximum,
//!   whatever units either side is written in.
//!
//! - **Required annotations** ([`annotation`]): every `metadata` mapping,
//!   at any depth, must carry a named annotation, optionally with a value
//!   matching a glob.
//!
//! Checks are configured from YAML ([`config`]), wrapped in [`Check`], and
//! run over multi-document manifest files by a [`Scanner`] ([`scan`]).
//! Findings are rendered as text or JSON by [`report`].
//!
//! ## Crate Policy
//!
//! - Depends on `kmg-core` and `kmg-tree` internally.
//! - Configuration errors surface when a check is built. A built check
//!   never fails on document content; bad values become findings.

pub mod annotation;
pub mod check;
pub mod config;
pub mod error;
pub mod report;
pub mod resource;
pub mod scan;

pub use annotation::MissingAnnotationCheck;
pub use check::Check;
pub use config::{
    CheckConfig, ChecksFile, MissingAnnotationConfig, ResourceLimitConfig, ResourceValueType,
};
pub use error::{CheckError, ScanError};
pub use report::{Finding, OutputFormat, ScanFailure, ScanReport};
pub use resource::ResourceLimitCheck;
pub use scan::{FileScan, Scanner};
