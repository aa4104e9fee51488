//! # Document Tree Boundary
//!
//! The read-only view of a parsed document that path matching needs: node
//! kind, ordered children, the key a node sits under, scalar text, and a
//! parent link. Anything implementing [`DocumentTree`] can be walked.

use std::fmt::Debug;
use std::hash::Hash;

/// Structural kind of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Key/value entries, in written order. Each child carries its key.
    Mapping,
    /// Ordered items.
    Sequence,
    /// A string, number, or boolean rendered as text.
    Scalar,
    /// An explicit or implicit null (`~`, `null`, or nothing after `key:`).
    Null,
}

/// A parsed document the walker can traverse.
///
/// Nodes are small copyable handles owned by the tree. Children of a
/// mapping are its entry values; [`DocumentTree::key`] gives the key each
/// one sits under.
pub trait DocumentTree {
    /// Handle to a node in this tree.
    type Node: Copy + Eq + Hash + Debug;

    /// The document root.
    fn root(&self) -> Self::Node;

    /// Structural kind of `node`.
    fn kind(&self, node: Self::Node) -> NodeKind;

    /// Children in document order. Empty for scalars and nulls.
    fn children(&self, node: Self::Node) -> &[Self::Node];

    /// The key `node` sits under, if its parent is a mapping.
    fn key(&self, node: Self::Node) -> Option<&str>;

    /// Text of a scalar node. `None` for every other kind.
    fn scalar(&self, node: Self::Node) -> Option<&str>;

    /// The enclosing node. `None` for the root.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Value of the entry `key` in `mapping`. Exact, case-sensitive match.
    ///
    /// Returns `None` if `mapping` is not a mapping or has no such entry.
    fn entry(&self, mapping: Self::Node, key: &str) -> Option<Self::Node> {
        if self.kind(mapping) != NodeKind::Mapping {
            return None;
        }
        self.children(mapping)
            .iter()
            .copied()
            .find(|child| self.key(*child) == Some(key))
    }

    /// The nearest node at or above `node` that is a mapping entry.
    ///
    /// Sequence items are skipped so that the result always has a key to
    /// show. Falls back to the root for documents with no keyed ancestor.
    fn enclosing_entry(&self, node: Self::Node) -> Self::Node {
        let mut current = node;
        loop {
            if self.key(current).is_some() {
                return current;
            }
            match self.parent(current) {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }
}
