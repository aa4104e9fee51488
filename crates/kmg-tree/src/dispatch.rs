//! # Validation Dispatch
//!
//! Turns the matches of a [`PathWalker`] walk into exactly one
//! [`MatchOutcome`] per parent context, and hands each outcome to an
//! [`OutcomeHandler`].
//!
//! ## Outcomes
//!
//! | Walk result | Target value | Outcome |
//! |-------------|--------------|---------|
//! | terminal found | accepted | `Present(node)` |
//! | terminal found | rejected | `PresentButInvalid(node, rejection)` |
//! | terminal missing | n/a | `Absent(anchor)` |
//!
//! The anchor of an absent outcome is the nearest enclosing mapping *entry*
//! of the context, so an annotation about a missing field lands on a node
//! that has a name (`metadata`, `annotations`) rather than on an anonymous
//! sequence item.
//!
//! ## Targets
//!
//! [`Target::Leaf`] checks the node under the final path segment.
//! [`Target::Entry`] treats that node as a leaf-bearing mapping and checks
//! one of its entries, which is how keys containing `/` (annotation names
//! such as `example.io/team`) are addressed. A null leaf-bearing mapping
//! counts as empty.
//!
//! ## Errors
//!
//! Values that fail the acceptance predicate are outcomes, never errors.
//! The only error is a [`DispatchError`] for a comparison that could not be
//! performed at all.

use std::cmp::Ordering;

use kmg_core::{GlobPattern, Quantity, QuantityError};
use tracing::{debug, trace};

use crate::error::{DispatchError, PathError};
use crate::path::PathExpression;
use crate::tree::{DocumentTree, NodeKind};
use crate::walker::{Matches, PathMatch, PathWalker};

/// What, relative to the end of the path, gets validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// The node under the final segment.
    Leaf,
    /// The entry with this key inside the node under the final segment.
    Entry(String),
}

/// Predicate applied to the text of a present target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acceptance {
    /// Presence is enough. Any kind of node is accepted.
    Any,
    /// The scalar text must equal this string exactly.
    Literal(String),
    /// The scalar text must match this glob.
    Glob(GlobPattern),
    /// The scalar text must be a quantity less than or equal to this bound,
    /// parsed in the bound's unit family.
    Quantity(Quantity),
}

/// Why a present value was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The target is a mapping or a sequence but a scalar was required.
    NotScalar,
    /// The text did not equal the literal or match the glob.
    Mismatch {
        /// The literal or glob as configured.
        expected: String,
    },
    /// The quantity is greater than the bound.
    Exceeds {
        /// The configured maximum.
        bound: Quantity,
    },
    /// The text is not a quantity.
    Malformed(QuantityError),
}

/// Result of applying an [`Acceptance`] to one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The value satisfies the predicate.
    Accepted,
    /// The value is present but fails the predicate.
    Rejected(Rejection),
}

impl Acceptance {
    /// Judge a value. `text` is `None` for mappings and sequences.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Quantity`] when the value and the bound
    /// cannot be compared. A value that fails to parse is a
    /// [`Rejection::Malformed`], not an error.
    pub fn evaluate(&self, text: Option<&str>) -> Result<Verdict, DispatchError> {
        let text = match (self, text) {
            (Acceptance::Any, _) => return Ok(Verdict::Accepted),
            (_, None) => return Ok(Verdict::Rejected(Rejection::NotScalar)),
            (_, Some(text)) => text,
        };
        let verdict = match self {
            Acceptance::Any => Verdict::Accepted,
            Acceptance::Literal(expected) if expected == text => Verdict::Accepted,
            Acceptance::Literal(expected) => Verdict::Rejected(Rejection::Mismatch {
                expected: expected.clone(),
            }),
            Acceptance::Glob(pattern) if pattern.matches(text) => Verdict::Accepted,
            Acceptance::Glob(pattern) => Verdict::Rejected(Rejection::Mismatch {
                expected: pattern.to_string(),
            }),
            Acceptance::Quantity(bound) => match Quantity::parse(text, bound.family()) {
                Err(err) => Verdict::Rejected(Rejection::Malformed(err)),
                Ok(value) => match value.compare(bound)? {
                    Ordering::Greater => Verdict::Rejected(Rejection::Exceeds {
                        bound: bound.clone(),
                    }),
                    Ordering::Less | Ordering::Equal => Verdict::Accepted,
                },
            },
        };
        Ok(verdict)
    }
}

/// One judged context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome<N> {
    /// The target exists and was accepted.
    Present(N),
    /// The target exists and was rejected.
    PresentButInvalid(N, Rejection),
    /// The target is missing. Carries the anchor for reporting.
    Absent(N),
}

impl<N: Copy> MatchOutcome<N> {
    /// The node the outcome is about.
    pub fn node(&self) -> N {
        match self {
            MatchOutcome::Present(node)
            | MatchOutcome::PresentButInvalid(node, _)
            | MatchOutcome::Absent(node) => *node,
        }
    }
}

/// Receives one callback per judged context.
pub trait OutcomeHandler<N> {
    /// The target exists and was accepted.
    fn on_present_valid(&mut self, node: N);

    /// The target exists and was rejected.
    fn on_present_invalid(&mut self, node: N, rejection: &Rejection);

    /// The target is missing; `anchor` is the nearest enclosing entry.
    fn on_absent(&mut self, anchor: N);
}

impl<N> OutcomeHandler<N> for Vec<MatchOutcome<N>> {
    fn on_present_valid(&mut self, node: N) {
        self.push(MatchOutcome::Present(node));
    }

    fn on_present_invalid(&mut self, node: N, rejection: &Rejection) {
        self.push(MatchOutcome::PresentButInvalid(node, rejection.clone()));
    }

    fn on_absent(&mut self, anchor: N) {
        self.push(MatchOutcome::Absent(anchor));
    }
}

/// Counts of the callbacks made by one [`ValidationDispatcher::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Contexts judged, one per outcome.
    pub matched: usize,
    /// Present targets that were accepted.
    pub valid: usize,
    /// Present targets that were rejected.
    pub invalid: usize,
    /// Contexts where the target was missing.
    pub absent: usize,
}

/// A path, a target, and a predicate, ready to run against documents.
///
/// Immutable once built; a single dispatcher can be run against any number
/// of trees, including from several threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDispatcher {
    path: PathExpression,
    target: Target,
    acceptance: Acceptance,
}

impl ValidationDispatcher {
    /// Build a dispatcher.
    ///
    /// # Errors
    ///
    /// [`PathError::EmptySegment`] if `target` is an entry with an empty
    /// key.
    pub fn new(
        path: PathExpression,
        target: Target,
        acceptance: Acceptance,
    ) -> Result<Self, PathError> {
        if let Target::Entry(key) = &target {
            if key.is_empty() {
                return Err(PathError::EmptySegment {
                    expression: format!("{path}[\"\"]"),
                });
            }
        }
        debug!(%path, ?target, ?acceptance, "validation dispatcher configured");
        Ok(Self {
            path,
            target,
            acceptance,
        })
    }

    pub fn path(&self) -> &PathExpression {
        &self.path
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn acceptance(&self) -> &Acceptance {
        &self.acceptance
    }

    /// Lazily judge every context the path reaches in `tree`.
    pub fn outcomes<'a, T>(&'a self, tree: &'a T) -> Outcomes<'a, T>
    where
        T: DocumentTree + ?Sized,
    {
        Outcomes {
            dispatcher: self,
            tree,
            matches: PathWalker::find(tree, &self.path),
        }
    }

    /// Judge every context and call `handler` once per context.
    ///
    /// # Errors
    ///
    /// Stops at the first [`DispatchError`]. Callbacks made before it stand.
    pub fn run<T, H>(&self, tree: &T, handler: &mut H) -> Result<DispatchSummary, DispatchError>
    where
        T: DocumentTree + ?Sized,
        H: OutcomeHandler<T::Node> + ?Sized,
    {
        let mut summary = DispatchSummary::default();
        for outcome in self.outcomes(tree) {
            summary.matched += 1;
            match outcome? {
                MatchOutcome::Present(node) => {
                    summary.valid += 1;
                    handler.on_present_valid(node);
                }
                MatchOutcome::PresentButInvalid(node, rejection) => {
                    summary.invalid += 1;
                    handler.on_present_invalid(node, &rejection);
                }
                MatchOutcome::Absent(anchor) => {
                    summary.absent += 1;
                    handler.on_absent(anchor);
                }
            }
        }
        debug!(
            path = %self.path,
            matched = summary.matched,
            valid = summary.valid,
            invalid = summary.invalid,
            absent = summary.absent,
            "dispatch complete"
        );
        Ok(summary)
    }

    fn judge<T>(
        &self,
        tree: &T,
        found: PathMatch<T::Node>,
    ) -> Result<MatchOutcome<T::Node>, DispatchError>
    where
        T: DocumentTree + ?Sized,
    {
        let terminal = match found.terminal {
            Some(terminal) => terminal,
            None => return Ok(MatchOutcome::Absent(tree.enclosing_entry(found.context))),
        };
        let node = match &self.target {
            Target::Leaf => terminal,
            Target::Entry(key) => match tree.entry(terminal, key) {
                Some(node) => node,
                None => return Ok(MatchOutcome::Absent(tree.enclosing_entry(terminal))),
            },
        };
        let text = match tree.kind(node) {
            NodeKind::Scalar => tree.scalar(node),
            NodeKind::Null => Some(""),
            NodeKind::Mapping | NodeKind::Sequence => None,
        };
        Ok(match self.acceptance.evaluate(text)? {
            Verdict::Accepted => MatchOutcome::Present(node),
            Verdict::Rejected(rejection) => MatchOutcome::PresentButInvalid(node, rejection),
        })
    }
}

/// Lazy iterator returned by [`ValidationDispatcher::outcomes`].
pub struct Outcomes<'a, T: DocumentTree + ?Sized> {
    dispatcher: &'a ValidationDispatcher,
    tree: &'a T,
    matches: Matches<'a, T>,
}

impl<'a, T: DocumentTree + ?Sized> Iterator for Outcomes<'a, T> {
    type Item = Result<MatchOutcome<T::Node>, DispatchError>;

    fn next(&mut self) -> Option<Self::Item> {
        let found = self.matches.next()?;
        let outcome = self.dispatcher.judge(self.tree, found);
        trace!(context = ?found.context, ?outcome, "outcome");
        Some(outcome)
    }
}
