//! # Path Expressions
//!
//! A path is an ordered list of literal field names. Written form:
//!
//! | Written | Anchored | Segments |
//! |---------|----------|----------|
//! | `spec/containers/resources` | yes | `spec`, `containers`, `resources` |
//! | `/spec/containers` | yes | `spec`, `containers` |
//! | `//metadata/annotations` | no | `metadata`, `annotations` |
//!
//! An anchored path must match from the document root. An unanchored path
//! may start matching at any depth. Segments are compared to mapping keys
//! exactly; there are no wildcards or predicates.

use std::fmt;
use std::str::FromStr;

use crate::error::PathError;

/// An immutable, validated path expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathExpression {
    segments: Vec<String>,
    anchored: bool,
}

impl PathExpression {
    /// Parse the written form. A leading `//` makes the path unanchored.
    ///
    /// # Errors
    ///
    /// [`PathError::Empty`] if there are no segments, and
    /// [`PathError::EmptySegment`] for `a//b`, a trailing `/`, or similar.
    pub fn parse(expression: &str) -> Result<Self, PathError> {
        let (anchored, rest) = if let Some(rest) = expression.strip_prefix("//") {
            (false, rest)
        } else if let Some(rest) = expression.strip_prefix('/') {
            (true, rest)
        } else {
            (true, expression)
        };
        if rest.is_empty() {
            return Err(PathError::Empty);
        }
        let segments: Vec<String> = rest.split('/').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(PathError::EmptySegment {
                expression: expression.to_string(),
            });
        }
        Ok(Self { segments, anchored })
    }

    /// Build an anchored path from segments. Segments may contain `/`.
    pub fn anchored<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_segments(segments, true)
    }

    /// Build an unanchored path from segments. Segments may contain `/`.
    pub fn unanchored<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_segments(segments, false)
    }

    fn from_segments<I, S>(segments: I, anchored: bool) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        let path = Self { segments, anchored };
        if path.segments.iter().any(String::is_empty) {
            return Err(PathError::EmptySegment {
                expression: path.to_string(),
            });
        }
        Ok(path)
    }

    /// Segments in descent order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns true if matching must start at the document root.
    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    /// The last segment, naming the target.
    pub fn terminal(&self) -> &str {
        // Construction guarantees at least one segment.
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// Number of segments. At least one.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.anchored {
            f.write_str("//")?;
        }
        f.write_str(&self.segments.join("/"))
    }
}

impl FromStr for PathExpression {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
