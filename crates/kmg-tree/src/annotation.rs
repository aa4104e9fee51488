//! # Annotations
//!
//! The output boundary. Checks never modify the tree they inspect; they
//! attach [`Annotation`]s to its nodes through an [`AnnotationSink`].
//!
//! ## Identity
//!
//! An [`AnnotationId`] names *what kind* of annotation this is, not one
//! particular instance. A check creates its ids once, when it is built, and
//! reuses them for every document it inspects. A sink keeps at most one
//! annotation per `(node, id)` pair, so running the same check twice over a
//! document leaves the result unchanged.

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

/// Stable identity of an annotation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AnnotationId(Uuid);

impl AnnotationId {
    /// A fresh random identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AnnotationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque payload attached to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    /// Identity of the annotation kind.
    pub id: AnnotationId,
    /// Name of the check that produced it.
    pub check: String,
    /// Human-readable message.
    pub message: String,
}

impl Annotation {
    pub fn new(id: AnnotationId, check: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id,
            check: check.into(),
            message: message.into(),
        }
    }
}

/// Receives annotations for nodes of a tree.
pub trait AnnotationSink<N> {
    /// Attach `annotation` to `node` unless an annotation with the same id
    /// is already attached there.
    fn annotate(&mut self, node: N, annotation: &Annotation);
}

/// An in-memory sink that keeps annotations in the order they were added.
#[derive(Debug, Clone)]
pub struct AnnotationSet<N> {
    entries: Vec<(N, Annotation)>,
}

impl<N> AnnotationSet<N> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every `(node, annotation)` pair in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &(N, Annotation)> {
        self.entries.iter()
    }

    pub fn into_inner(self) -> Vec<(N, Annotation)> {
        self.entries
    }
}

impl<N: PartialEq> AnnotationSet<N> {
    /// Annotations attached to `node`.
    pub fn on<'a>(&'a self, node: &'a N) -> impl Iterator<Item = &'a Annotation> + 'a {
        self.entries
            .iter()
            .filter(move |(n, _)| n == node)
            .map(|(_, a)| a)
    }
}

impl<N> Default for AnnotationSet<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Copy + PartialEq> AnnotationSink<N> for AnnotationSet<N> {
    fn annotate(&mut self, node: N, annotation: &Annotation) {
        let present = self
            .entries
            .iter()
            .any(|(n, a)| *n == node && a.id == annotation.id);
        if !present {
            self.entries.push((node, annotation.clone()));
        }
    }
}
