//! # Error Types
//!
//! Errors raised while interpreting values found in manifests. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - `Malformed` is a data problem. Callers scanning documents surface it as
//!   a finding at the offending node.
//! - `UnitFamilyMismatch` is a wiring problem. It never depends on document
//!   content and callers treat it as fatal.

use thiserror::Error;

use crate::family::UnitFamily;

/// Error produced by quantity parsing and comparison.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// The text is not a valid quantity for the requested family.
    #[error("malformed quantity {text:?}: {reason}")]
    Malformed {
        /// The text exactly as it was supplied.
        text: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Two quantities from different unit families were compared.
    #[error("cannot compare {left} quantity with {right} quantity")]
    UnitFamilyMismatch {
        /// Family of the left-hand operand.
        left: UnitFamily,
        /// Family of the right-hand operand.
        right: UnitFamily,
    },
}

impl QuantityError {
    pub(crate) fn malformed(text: &str, reason: impl Into<String>) -> Self {
        Self::Malformed {
            text: text.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns true for errors caused by document data rather than wiring.
    pub fn is_data_error(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

/// A resource type name that does not name a [`UnitFamily`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown resource type {0:?}; expected \"cpu\" or \"memory\"")]
pub struct UnknownUnitFamily(pub String);

/// A value glob that cannot be compiled.
#[derive(Error, Debug, Clone)]
#[error("invalid glob {pattern:?}: {source}")]
pub struct GlobError {
    /// The pattern exactly as it was supplied.
    pub pattern: String,
    /// Why `globset` rejected it.
    pub source: globset::Error,
}
