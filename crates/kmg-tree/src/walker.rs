//! # Path Walker
//!
//! Lazy depth-first matching of a [`PathExpression`] against a
//! [`DocumentTree`].
//!
//! ## Matching Rules
//!
//! - A mapping matches a segment if it has an entry whose key equals the
//!   segment exactly.
//! - A sequence met during descent is transparent: each item is tried
//!   against the same segment, so `spec/containers/resources` reaches the
//!   `resources` of every container.
//! - A missing intermediate segment ends that branch silently.
//! - A missing *final* segment still yields a [`PathMatch`] with
//!   `terminal: None`, because the object that should hold the target
//!   exists.
//!
//! Anchored paths start at the root. Unanchored paths start at every
//! mapping, at any depth, that has an entry for the first segment.
//!
//! ## Uniqueness
//!
//! Each match's `context` is reached from its starting point by exactly
//! `len - 1` keyed steps, and a node has a single chain of ancestors, so no
//! context is yielded twice for one walk.

use crate::path::PathExpression;
use crate::tree::{DocumentTree, NodeKind};

/// One place the path led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathMatch<N> {
    /// The mapping that holds (or should hold) the final segment.
    pub context: N,
    /// The node under the final segment, if the entry exists.
    pub terminal: Option<N>,
}

/// Entry point for path matching.
pub struct PathWalker;

impl PathWalker {
    /// Start a walk. Nothing is visited until the iterator is advanced.
    pub fn find<'t, T>(tree: &'t T, path: &'t PathExpression) -> Matches<'t, T>
    where
        T: DocumentTree + ?Sized,
    {
        let root = tree.root();
        let (descent, scan) = if path.is_anchored() {
            (vec![(root, 0)], None)
        } else {
            (Vec::new(), Some(vec![root]))
        };
        Matches {
            tree,
            segments: path.segments(),
            descent,
            scan,
        }
    }
}

/// Iterator over the matches of one walk, in document order.
///
/// Single use: once exhausted, start a new walk with [`PathWalker::find`].
pub struct Matches<'t, T: DocumentTree + ?Sized> {
    tree: &'t T,
    segments: &'t [String],
    /// Pending `(node, segment index)` pairs, top of stack visited next.
    descent: Vec<(T::Node, usize)>,
    /// Pending nodes of the any-depth scan. `None` for anchored paths.
    scan: Option<Vec<T::Node>>,
}

impl<'t, T: DocumentTree + ?Sized> Matches<'t, T> {
    fn step(&mut self, node: T::Node, depth: usize) -> Option<PathMatch<T::Node>> {
        match self.tree.kind(node) {
            NodeKind::Sequence => {
                for item in self.tree.children(node).iter().rev() {
                    self.descent.push((*item, depth));
                }
                None
            }
            NodeKind::Mapping => {
                let is_last = depth + 1 == self.segments.len();
                match self.tree.entry(node, &self.segments[depth]) {
                    Some(child) if is_last => Some(PathMatch {
                        context: node,
                        terminal: Some(child),
                    }),
                    Some(child) => {
                        self.descent.push((child, depth + 1));
                        None
                    }
                    None if is_last => Some(PathMatch {
                        context: node,
                        terminal: None,
                    }),
                    None => None,
                }
            }
            NodeKind::Scalar | NodeKind::Null => None,
        }
    }

    /// Advance the any-depth scan to the next mapping holding the first
    /// segment.
    fn next_start(&mut self) -> Option<T::Node> {
        let scan = self.scan.as_mut()?;
        let first = self.segments.first()?;
        while let Some(node) = scan.pop() {
            for child in self.tree.children(node).iter().rev() {
                scan.push(*child);
            }
            if self.tree.entry(node, first).is_some() {
                return Some(node);
            }
        }
        None
    }
}

impl<'t, T: DocumentTree + ?Sized> Iterator for Matches<'t, T> {
    type Item = PathMatch<T::Node>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            while let Some((node, depth)) = self.descent.pop() {
                if let Some(found) = self.step(node, depth) {
                    return Some(found);
                }
            }
            let start = self.next_start()?;
            self.descent.push((start, 0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    const DEPLOYMENT: &str = r#"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  annotations:
    example.io/team: payments
spec:
  template:
    metadata:
      labels:
        app: web
    spec:
      containers:
      - name: app
        resources:
          limits:
            memory: 1Gi
      - name: sidecar
        resources:
          requests:
            cpu: 100m
"#;

    fn walk(doc: &Document, path: &str) -> Vec<PathMatch<crate::NodeId>> {
        let path = PathExpression::parse(path).unwrap();
        PathWalker::find(doc, &path).collect()
    }

    #[test]
    fn test_anchored_must_start_at_root() {
        let doc = Document::parse(DEPLOYMENT).unwrap();
        assert!(walk(&doc, "spec/containers/resources/limits/memory").is_empty());
        let found = walk(&doc, "spec/template/spec/containers/resources/limits/memory");
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_sequence_items_each_yield() {
        let doc = Document::parse(DEPLOYMENT).unwrap();
        let found = walk(&doc, "spec/template/spec/containers/name");
        let names: Vec<_> = found
            .iter()
            .map(|m| doc.scalar(m.terminal.unwrap()).unwrap())
            .collect();
        assert_eq!(names, vec!["app", "sidecar"]);

        // The sidecar has no `limits`, an intermediate segment, so only the
        // first container reaches `memory`.
        let found = walk(&doc, "spec/template/spec/containers/resources/limits/memory");
        assert_eq!(found.len(), 1);
        assert_eq!(doc.scalar(found[0].terminal.unwrap()), Some("1Gi"));
    }

    #[test]
    fn test_missing_final_segment_yields_absent() {
        let doc = Document::parse(DEPLOYMENT).unwrap();
        let found = walk(&doc, "spec/template/spec/containers/resources/requests");
        assert_eq!(found.len(), 2);
        assert!(found[0].terminal.is_none());
        assert_eq!(doc.location(found[0].context), "spec.template.spec.containers[0].resources");
        assert!(found[1].terminal.is_some());
    }

    #[test]
    fn test_missing_intermediate_segment_is_silent() {
        let doc = Document::parse(DEPLOYMENT).unwrap();
        assert!(walk(&doc, "status/conditions/type").is_empty());
        assert!(walk(&doc, "metadata/labels/app").is_empty());
    }

    #[test]
    fn test_unanchored_matches_at_any_depth() {
        let doc = Document::parse(DEPLOYMENT).unwrap();
        let found = walk(&doc, "//metadata/annotations");
        assert_eq!(found.len(), 2);
        assert_eq!(doc.location(found[0].context), "metadata");
        assert!(found[0].terminal.is_some());
        assert_eq!(doc.location(found[1].context), "spec.template.metadata");
        assert!(found[1].terminal.is_none());
    }

    #[test]
    fn test_unanchored_without_start_yields_nothing() {
        let doc = Document::parse(DEPLOYMENT).unwrap();
        assert!(walk(&doc, "//status/phase").is_empty());
    }

    #[test]
    fn test_scalar_where_mapping_expected() {
        let doc = Document::parse("spec: none\n").unwrap();
        assert!(walk(&doc, "spec/containers").is_empty());
    }

    #[test]
    fn test_sequence_root() {
        let doc = Document::parse("- kind: A\n- kind: B\n- other: C\n").unwrap();
        let found = walk(&doc, "kind");
        assert_eq!(found.len(), 3);
        assert!(found[2].terminal.is_none());
    }

    #[test]
    fn test_contexts_are_distinct() {
        let doc = Document::parse("x:\n  x:\n    x:\n      x: leaf\n").unwrap();
        let found = walk(&doc, "//x/x");
        let mut contexts: Vec<_> = found.iter().map(|m| m.context).collect();
        let before = contexts.len();
        contexts.sort();
        contexts.dedup();
        assert_eq!(contexts.len(), before);
        assert_eq!(before, 3);
    }

    #[test]
    fn test_lazy_iteration() {
        let doc = Document::parse(DEPLOYMENT).unwrap();
        let path = PathExpression::parse("//metadata/annotations").unwrap();
        let mut matches = PathWalker::find(&doc, &path);
        assert!(matches.next().is_some());
        assert!(matches.next().is_some());
        assert!(matches.next().is_none());
        assert!(matches.next().is_none());
    }
}
