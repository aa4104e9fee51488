//! # Documents
//!
//! An arena-backed tree built from `serde_yaml` values. Every node gets a
//! [`NodeId`] in document pre-order, knows its parent, and remembers the
//! key or index it sits under, which is enough to name any node with a
//! readable location such as `spec.containers[0].resources.limits.memory`.
//!
//! ## Scalar Text
//!
//! Strings keep their text. Numbers and booleans are rendered the way
//! `serde_yaml` prints them (`2`, `0.5`, `true`). Tags are dropped and
//! the tagged value is used.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::TreeError;
use crate::tree::{DocumentTree, NodeKind};

/// Handle to a node of a [`Document`]. Ordered by document position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in document pre-order.
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    key: Option<String>,
    index: Option<usize>,
    text: Option<String>,
    children: Vec<NodeId>,
}

/// A parsed YAML document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Document {
    /// Parse a single YAML document.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Yaml`] for invalid YAML (including streams with
    /// more than one document) and [`TreeError::UnsupportedKey`] for
    /// non-scalar mapping keys.
    pub fn parse(text: &str) -> Result<Self, TreeError> {
        let value: Value = serde_yaml::from_str(text)?;
        Self::from_value(&value)
    }

    /// Parse every document of a `---`-separated YAML stream, one result
    /// per document in stream order.
    ///
    /// A document that is valid YAML but not a tree fails on its own and the
    /// documents after it are still parsed. Invalid YAML ends the stream:
    /// its error is the last entry.
    pub fn parse_stream(text: &str) -> Vec<Result<Self, TreeError>> {
        let mut documents = Vec::new();
        for de in serde_yaml::Deserializer::from_str(text) {
            match Value::deserialize(de) {
                Ok(value) => documents.push(Self::from_value(&value)),
                Err(err) => {
                    documents.push(Err(TreeError::Yaml(err)));
                    break;
                }
            }
        }
        documents
    }

    /// Build a tree from an already parsed value.
    pub fn from_value(value: &Value) -> Result<Self, TreeError> {
        let mut document = Self { nodes: Vec::new() };
        document.insert(value, None, None, None)?;
        Ok(document)
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no nodes. Never the case for a parsed
    /// document, whose root is at least a null.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Human-readable location of `node`, e.g.
    /// `spec.containers[0].resources` or `metadata.annotations["example.io/team"]`.
    /// The root is `$`.
    pub fn location(&self, node: NodeId) -> String {
        let mut parts = Vec::new();
        let mut current = Some(node);
        while let Some(id) = current {
            let data = &self.nodes[id.0];
            if let Some(key) = &data.key {
                parts.push(PathPart::Key(key));
            } else if let Some(index) = data.index {
                parts.push(PathPart::Index(index));
            }
            current = data.parent;
        }

        if parts.is_empty() {
            return "$".to_string();
        }

        let mut out = String::new();
        for part in parts.iter().rev() {
            match part {
                PathPart::Key(key) if is_plain_key(key) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(key);
                }
                PathPart::Key(key) => out.push_str(&format!("[{key:?}]")),
                PathPart::Index(index) => out.push_str(&format!("[{index}]")),
            }
        }
        out
    }

    fn insert(
        &mut self,
        value: &Value,
        parent: Option<NodeId>,
        key: Option<String>,
        index: Option<usize>,
    ) -> Result<NodeId, TreeError> {
        let id = NodeId(self.nodes.len());
        let (kind, text) = match value {
            Value::Null => (NodeKind::Null, None),
            Value::Bool(b) => (NodeKind::Scalar, Some(b.to_string())),
            Value::Number(n) => (NodeKind::Scalar, Some(n.to_string())),
            Value::String(s) => (NodeKind::Scalar, Some(s.clone())),
            Value::Sequence(_) => (NodeKind::Sequence, None),
            Value::Mapping(_) => (NodeKind::Mapping, None),
            Value::Tagged(tagged) => return self.insert(&tagged.value, parent, key, index),
        };
        self.nodes.push(NodeData {
            kind,
            parent,
            key,
            index,
            text,
            children: Vec::new(),
        });

        let children = match value {
            Value::Sequence(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| self.insert(item, Some(id), None, Some(i)))
                .collect::<Result<Vec<_>, _>>()?,
            Value::Mapping(map) => {
                let mut children = Vec::with_capacity(map.len());
                for (k, v) in map {
                    let key = match k {
                        Value::String(s) => s.clone(),
                        Value::Number(n) => n.to_string(),
                        Value::Bool(b) => b.to_string(),
                        Value::Null => "null".to_string(),
                        _ => {
                            return Err(TreeError::UnsupportedKey {
                                location: self.location(id),
                            })
                        }
                    };
                    children.push(self.insert(v, Some(id), Some(key), None)?);
                }
                children
            }
            _ => Vec::new(),
        };
        self.nodes[id.0].children = children;
        Ok(id)
    }
}

enum PathPart<'a> {
    Key(&'a str),
    Index(usize),
}

fn is_plain_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl DocumentTree for Document {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn kind(&self, node: NodeId) -> NodeKind {
        self.nodes[node.0].kind
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    fn key(&self, node: NodeId) -> Option<&str> {
        self.nodes[node.0].key.as_deref()
    }

    fn scalar(&self, node: NodeId) -> Option<&str> {
        self.nodes[node.0].text.as_deref()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }
}
