//! # kmg-tree — Documents, Paths, and Validation Dispatch
//!
//! Locates nodes in a parsed manifest by a declarative path and reports,
//! for every place the path leads, whether the value there is valid,
//! invalid, or missing.
//!
//! ## Layers
//!
//! - [`tree`]: the [`DocumentTree`] boundary. The algorithms in this crate
//!   only see nodes through it.
//! - [`document`]: [`Document`] is an arena-backed tree built from
//!   `serde_yaml` values. It is the tree the rest of the workspace uses.
//! - [`path`]: [`PathExpression`] with literal segments, anchored at the root
//!   or matching at any depth (`//metadata/annotations`).
//! - [`walker`]: [`PathWalker`] is a lazy depth-first matcher that tells
//!   "target present" apart from "parent present, target missing".
//! - [`dispatch`]: [`ValidationDispatcher`] turns matches into exactly one
//!   [`MatchOutcome`] per parent context and hands it to an
//!   [`OutcomeHandler`].
//! - [`annotation`]: the output boundary. Handlers attach [`Annotation`]s
//!   to nodes through an [`AnnotationSink`]; the tree itself is never
//!   modified.
//!
//! ## Crate Policy
//!
//! - Depends only on `kmg-core` internally.
//! - Traversal is synchronous and performs no I/O.
//! - Configuration problems (empty paths, empty keys) are rejected at
//!   construction; document problems become outcomes, never errors.

pub mod annotation;
pub mod dispatch;
pub mod document;
pub mod error;
pub mod path;
pub mod tree;
pub mod walker;

pub use annotation::{Annotation, AnnotationId, AnnotationSet, AnnotationSink};
pub use dispatch::{
    Acceptance, DispatchSummary, MatchOutcome, OutcomeHandler, Outcomes, Rejection, Target,
    ValidationDispatcher, Verdict,
};
pub use document::{Document, NodeId};
pub use error::{DispatchError, PathError, TreeError};
pub use path::PathExpression;
pub use tree::{DocumentTree, NodeKind};
pub use walker::{Matches, PathMatch, PathWalker};
