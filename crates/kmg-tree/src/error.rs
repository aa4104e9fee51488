//! # Error Types
//!
//! Errors for tree construction, path configuration, and dispatch.
//!
//! ## Design
//!
//! - `PathError` is raised when a check is built, before any document is
//!   touched. A misconfigured check never runs.
//! - `TreeError` covers documents that cannot be represented as a tree.
//! - `DispatchError` is fatal and only wraps defects in how a check was
//!   wired. Bad values inside a document are reported as
//!   [`crate::MatchOutcome::PresentButInvalid`] instead.

use kmg_core::QuantityError;
use thiserror::Error;

/// A path expression that cannot address anything.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The expression has no segments.
    #[error("path expression is empty")]
    Empty,

    /// One of the segments is the empty string (e.g. `a//b` or `a/`).
    #[error("path expression {expression:?} contains an empty segment")]
    EmptySegment {
        /// The expression as written.
        expression: String,
    },
}

/// A document that could not be turned into a tree.
#[derive(Error, Debug)]
pub enum TreeError {
    /// The YAML text did not parse.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A mapping key is a mapping or a sequence.
    #[error("unsupported mapping key at {location}: keys must be scalars")]
    UnsupportedKey {
        /// Location of the mapping that holds the key.
        location: String,
    },
}

/// A fatal error raised while dispatching outcomes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// A quantity comparison was wired with mismatched unit families.
    #[error("quantity comparison failed: {0}")]
    Quantity(#[from] QuantityError),
}
