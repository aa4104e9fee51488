//! # Glob Patterns
//!
//! Glob matching for leaf values, compiled with `globset`. `*` matches any
//! run of characters (including `/`, so `*.io/*` matches
//! `mycompany.io/annotation`), `?` matches one character, and `[...]`
//! classes and `{a,b}` alternations are supported. Matching is anchored at
//! both ends and case-sensitive.
//!
//! Paths are never globbed; only scalar values are.

use globset::{Glob, GlobMatcher};

use crate::error::GlobError;

/// A compiled glob pattern.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    pattern: String,
    matcher: GlobMatcher,
}

impl GlobPattern {
    /// Compile a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`GlobError`] for an unclosed class or alternation, or any
    /// other pattern `globset` rejects.
    pub fn new(pattern: impl Into<String>) -> Result<Self, GlobError> {
        let pattern = pattern.into();
        let matcher = Glob::new(&pattern)
            .map_err(|source| GlobError {
                pattern: pattern.clone(),
                source,
            })?
            .compile_matcher();
        Ok(Self { pattern, matcher })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Returns true if `text` matches the whole pattern.
    pub fn matches(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }
}

impl PartialEq for GlobPattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for GlobPattern {}

impl std::fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pattern)
    }
}
