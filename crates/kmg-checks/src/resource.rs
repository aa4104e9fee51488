//! # Resource Limit Check
//!
//! Flags container resource quantities above a configured maximum. The
//! check looks at `spec/containers/resources/<limits|requests>/<cpu|memory>`
//! from the document root and compares every value it finds against the
//! bound in canonical units, so `2000M` exceeds `1Gi` and `1024Mi` does not.
//!
//! ## Findings
//!
//! | Value | Message |
//! |-------|---------|
//! | greater than the bound | `exceeds maximum of <bound>` |
//! | not a quantity | `malformed quantity "<text>": <reason>` |
//! | a mapping or sequence | `expected a quantity, found a mapping or sequence` |
//!
//! Values at or below the bound, and containers without the field, are not
//! reported.
//!
//! The bound is shown in the unit it was configured in, with the milli
//! suffix printed as `M` (`64m` reads `64M`) to match existing report
//! consumers.

use kmg_core::{Quantity, UnitSuffix};
use kmg_tree::{
    Acceptance, Annotation, AnnotationId, AnnotationSink, DispatchError, DispatchSummary,
    DocumentTree, OutcomeHandler, PathExpression, Rejection, Target, ValidationDispatcher,
};
use tracing::debug;

use crate::config::ResourceLimitConfig;
use crate::error::CheckError;

/// A built resource-limit check.
#[derive(Debug, Clone)]
pub struct ResourceLimitCheck {
    config: ResourceLimitConfig,
    bound: Quantity,
    dispatcher: ValidationDispatcher,
    exceeds: AnnotationId,
    malformed: AnnotationId,
}

impl ResourceLimitCheck {
    /// Check name used in findings.
    pub const NAME: &'static str = "resource-limit";

    /// Build the check, parsing the bound in the configured resource's
    /// unit family.
    pub fn new(config: ResourceLimitConfig) -> Result<Self, CheckError> {
        let bound = Quantity::parse(&config.resource_limit, config.resource_type).map_err(
            |source| CheckError::InvalidLimit {
                limit: config.resource_limit.clone(),
                source,
            },
        )?;
        let path = PathExpression::anchored([
            "spec",
            "containers",
            "resources",
            config.resource_value_type.as_str(),
            config.resource_type.as_str(),
        ])?;
        let dispatcher =
            ValidationDispatcher::new(path, Target::Leaf, Acceptance::Quantity(bound.clone()))?;
        debug!(
            value_type = %config.resource_value_type,
            resource = %config.resource_type,
            bound = %bound,
            "resource limit check built"
        );
        Ok(Self {
            config,
            bound,
            dispatcher,
            exceeds: AnnotationId::new(),
            malformed: AnnotationId::new(),
        })
    }

    pub fn config(&self) -> &ResourceLimitConfig {
        &self.config
    }

    pub fn bound(&self) -> &Quantity {
        &self.bound
    }

    /// Annotate every offending value in `tree`.
    pub fn inspect<T, S>(&self, tree: &T, sink: &mut S) -> Result<DispatchSummary, DispatchError>
    where
        T: DocumentTree + ?Sized,
        S: AnnotationSink<T::Node> + ?Sized,
    {
        let mut handler = LimitAnnotator { check: self, sink };
        self.dispatcher.run(tree, &mut handler)
    }
}

/// How a bound is shown in messages.
pub fn display_bound(bound: &Quantity) -> String {
    match bound.suffix() {
        UnitSuffix::Milli => format!("{}M", bound.number()),
        _ => bound.format(),
    }
}

struct LimitAnnotator<'a, S: ?Sized> {
    check: &'a ResourceLimitCheck,
    sink: &'a mut S,
}

impl<N, S: AnnotationSink<N> + ?Sized> OutcomeHandler<N> for LimitAnnotator<'_, S> {
    fn on_present_valid(&mut self, _node: N) {}

    fn on_present_invalid(&mut self, node: N, rejection: &Rejection) {
        let (id, message) = match rejection {
            Rejection::Exceeds { bound } => (
                self.check.exceeds,
                format!("exceeds maximum of {}", display_bound(bound)),
            ),
            Rejection::Malformed(err) => (self.check.malformed, err.to_string()),
            Rejection::NotScalar => (
                self.check.malformed,
                "expected a quantity, found a mapping or sequence".to_string(),
            ),
            Rejection::Mismatch { expected } => {
                (self.check.malformed, format!("expected {expected}"))
            }
        };
        self.sink
            .annotate(node, &Annotation::new(id, ResourceLimitCheck::NAME, message));
    }

    fn on_absent(&mut self, _anchor: N) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ResourceValueType;
    use kmg_core::UnitFamily;
    use kmg_tree::{AnnotationSet, Document, NodeId};

    fn check(value_type: ResourceValueType, family: UnitFamily, limit: &str) -> ResourceLimitCheck {
        ResourceLimitCheck::new(ResourceLimitConfig {
            resource_value_type: value_type,
            resource_type: family,
            resource_limit: limit.to_string(),
        })
        .unwrap()
    }

    fn run(check: &ResourceLimitCheck, yaml: &str) -> Vec<(String, String)> {
        let doc = Document::parse(yaml).unwrap();
        let mut sink: AnnotationSet<NodeId> = AnnotationSet::new();
        check.inspect(&doc, &mut sink).unwrap();
        sink.iter()
            .map(|(node, a)| (doc.location(*node), a.message.clone()))
            .collect()
    }

    #[test]
    fn test_display_bound() {
        let q = |s: &str, f| Quantity::parse(s, f).unwrap();
        assert_eq!(display_bound(&q("64m", UnitFamily::Memory)), "64M");
        assert_eq!(display_bound(&q("100m", UnitFamily::Cpu)), "100M");
        assert_eq!(display_bound(&q("1Gi", UnitFamily::Memory)), "1Gi");
        assert_eq!(display_bound(&q("2", UnitFamily::Cpu)), "2");
    }

    #[test]
    fn test_bad_limit_rejected_at_build() {
        let err = ResourceLimitCheck::new(ResourceLimitConfig {
            resource_value_type: ResourceValueType::Limits,
            resource_type: UnitFamily::Memory,
            resource_limit: "1 Gi".into(),
        })
        .unwrap_err();
        assert!(err.to_string().contains("invalid resource limit"));
    }

    #[test]
    fn test_every_container_is_checked() {
        let c = check(ResourceValueType::Limits, UnitFamily::Cpu, "1");
        let found = run(
            &c,
            r#"
spec:
  containers:
  - resources:
      limits:
        cpu: "2"
  - resources:
      limits:
        cpu: 500m
  - resources:
      limits:
        cpu: 1500m
"#,
        );
        assert_eq!(
            found,
            vec![
                (
                    "spec.containers[0].resources.limits.cpu".to_string(),
                    "exceeds maximum of 1".to_string()
                ),
                (
                    "spec.containers[2].resources.limits.cpu".to_string(),
                    "exceeds maximum of 1".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_malformed_value_is_a_finding() {
        let c = check(ResourceValueType::Limits, UnitFamily::Memory, "1Gi");
        let found = run(
            &c,
            "spec:\n  containers:\n  - resources:\n      limits:\n        memory: lots\n",
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].1, r#"malformed quantity "lots": unknown unit suffix "lots""#);
    }

    #[test]
    fn test_structure_where_quantity_expected() {
        let c = check(ResourceValueType::Limits, UnitFamily::Memory, "1Gi");
        let found = run(
            &c,
            "spec:\n  containers:\n  - resources:\n      limits:\n        memory:\n          value: 2Gi\n",
        );
        assert_eq!(
            found[0].1,
            "expected a quantity, found a mapping or sequence"
        );
    }

    #[test]
    fn test_missing_field_not_reported() {
        let c = check(ResourceValueType::Requests, UnitFamily::Memory, "1Gi");
        let found = run(
            &c,
            "spec:\n  containers:\n  - resources:\n      limits:\n        memory: 8Gi\n",
        );
        assert!(found.is_empty());
    }
}
