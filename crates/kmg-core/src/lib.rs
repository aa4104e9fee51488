//! # kmg-core — Foundational Types for Manifest Guard
//!
//! This crate is the leaf of the Manifest Guard workspace. It knows nothing
//! about documents or trees; it only understands the values found inside
//! them.
//!
//! ## Key Design Principles
//!
//! 1. **One canonical magnitude per quantity.** `"1Gi"` and `"1024Mi"` parse
//!    to the same [`Magnitude`]. All comparisons go through it, never through
//!    the raw text.
//!
//! 2. **Unit families are a closed enum.** [`UnitFamily`] has exactly two
//!    variants. Comparing across families is a typed error, not a silent
//!    `false`.
//!
//! 3. **Exact arithmetic.** Magnitudes are scaled integers. No floating point
//!    participates in a comparison.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `kmg-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod family;
pub mod glob;
pub mod quantity;

// Re-export primary types for ergonomic imports.
pub use error::{GlobError, QuantityError, UnknownUnitFamily};
pub use family::UnitFamily;
pub use glob::GlobPattern;
pub use quantity::{Magnitude, Quantity, UnitSuffix};
