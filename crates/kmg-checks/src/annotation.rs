//! # Missing Annotation Check
//!
//! Every `metadata` mapping, at any depth, must carry the named annotation.
//! A Deployment therefore has two places to look: its own `metadata` and
//! the pod template's `spec/template/metadata`.
//!
//! - No `annotations` mapping, or no entry for the name:
//!   `missing:<name>` on the nearest enclosing entry (`metadata` or
//!   `annotations`).
//! - Entry present but its value does not match the configured glob:
//!   `invalid:<glob>` on the annotation entry.
//!
//! Without a glob, any value is accepted.

use kmg_core::GlobPattern;
use kmg_tree::{
    Acceptance, Annotation, AnnotationId, AnnotationSink, DispatchError, DispatchSummary,
    DocumentTree, OutcomeHandler, PathExpression, Rejection, Target, ValidationDispatcher,
};
use tracing::debug;

use crate::config::MissingAnnotationConfig;
use crate::error::CheckError;

const ANNOTATIONS_PATH: &str = "//metadata/annotations";

/// A built missing-annotation check.
#[derive(Debug, Clone)]
pub struct MissingAnnotationCheck {
    config: MissingAnnotationConfig,
    dispatcher: ValidationDispatcher,
    missing: Annotation,
    invalid: Option<Annotation>,
}

impl MissingAnnotationCheck {
    /// Check name used in findings.
    pub const NAME: &'static str = "missing-annotation";

    pub fn new(config: MissingAnnotationConfig) -> Result<Self, CheckError> {
        let path = PathExpression::parse(ANNOTATIONS_PATH)?;
        let glob = config.value.as_deref().map(GlobPattern::new).transpose()?;
        let acceptance = match &glob {
            Some(glob) => Acceptance::Glob(glob.clone()),
            None => Acceptance::Any,
        };
        let dispatcher = ValidationDispatcher::new(
            path,
            Target::Entry(config.annotation_name.clone()),
            acceptance,
        )?;

        let missing = Annotation::new(
            AnnotationId::new(),
            Self::NAME,
            format!("missing:{}", config.annotation_name),
        );
        let invalid = glob.as_ref().map(|glob| {
            Annotation::new(AnnotationId::new(), Self::NAME, format!("invalid:{glob}"))
        });
        debug!(
            annotation = %config.annotation_name,
            value = ?config.value,
            "missing annotation check built"
        );
        Ok(Self {
            config,
            dispatcher,
            missing,
            invalid,
        })
    }

    pub fn config(&self) -> &MissingAnnotationConfig {
        &self.config
    }

    /// Annotate every `metadata` lacking a valid annotation in `tree`.
    pub fn inspect<T, S>(&self, tree: &T, sink: &mut S) -> Result<DispatchSummary, DispatchError>
    where
        T: DocumentTree + ?Sized,
        S: AnnotationSink<T::Node> + ?Sized,
    {
        let mut handler = EntryAnnotator {
            missing: &self.missing,
            invalid: self.invalid.as_ref(),
            sink,
        };
        self.dispatcher.run(tree, &mut handler)
    }
}

struct EntryAnnotator<'a, S: ?Sized> {
    missing: &'a Annotation,
    invalid: Option<&'a Annotation>,
    sink: &'a mut S,
}

impl<N, S: AnnotationSink<N> + ?Sized> OutcomeHandler<N> for EntryAnnotator<'_, S> {
    fn on_present_valid(&mut self, _node: N) {}

    fn on_present_invalid(&mut self, node: N, _rejection: &Rejection) {
        if let Some(invalid) = self.invalid {
            self.sink.annotate(node, invalid);
        }
    }

    fn on_absent(&mut self, anchor: N) {
        self.sink.annotate(anchor, self.missing);
    }
}
