//! The closed set of checks a scan can run.

use kmg_tree::{AnnotationSink, DispatchError, DispatchSummary, DocumentTree};

use crate::annotation::MissingAnnotationCheck;
use crate::config::CheckConfig;
use crate::error::CheckError;
use crate::resource::ResourceLimitCheck;

/// A built check of either kind.
#[derive(Debug, Clone)]
pub enum Check {
    ResourceLimit(ResourceLimitCheck),
    MissingAnnotation(MissingAnnotationCheck),
}

impl Check {
    /// Build a check from its configuration.
    pub fn from_config(config: &CheckConfig) -> Result<Self, CheckError> {
        Ok(match config {
            CheckConfig::ResourceLimit(c) => Self::ResourceLimit(ResourceLimitCheck::new(c.clone())?),
            CheckConfig::MissingAnnotation(c) => {
                Self::MissingAnnotation(MissingAnnotationCheck::new(c.clone())?)
            }
        })
    }

    /// Name reported with every finding of this check.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ResourceLimit(_) => ResourceLimitCheck::NAME,
            Self::MissingAnnotation(_) => MissingAnnotationCheck::NAME,
        }
    }

    /// Annotate `tree` with this check's findings.
    pub fn inspect<T, S>(&self, tree: &T, sink: &mut S) -> Result<DispatchSummary, DispatchError>
    where
        T: DocumentTree + ?Sized,
        S: AnnotationSink<T::Node> + ?Sized,
    {
        match self {
            Self::ResourceLimit(check) => check.inspect(tree, sink),
            Self::MissingAnnotation(check) => check.inspect(tree, sink),
        }
    }
}

impl From<ResourceLimitCheck> for Check {
    fn from(check: ResourceLimitCheck) -> Self {
        Self::ResourceLimit(check)
    }
}

impl From<MissingAnnotationCheck> for Check {
    fn from(check: MissingAnnotationCheck) -> Self {
        Self::MissingAnnotation(check)
    }
}
