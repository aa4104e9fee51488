//! # Check Configuration
//!
//! Checks are configured with the option names operators already use for
//! these policies (`resourceValueType`, `resourceType`, `resourceLimit`,
//! `annotationName`, `value`). A check file lists any number of them:
//!
//! ```yaml
//! checks:
//!   - kind: resource-limit
//!     resourceValueType: limits
//!     resourceType: memory
//!     resourceLimit: 2Gi
//!   - kind: missing-annotation
//!     annotationName: mycompany.io/annotation
//!     value: "value.*"
//! ```
//!
//! Unknown `kind`, `resourceValueType`, or `resourceType` values are
//! rejected while deserializing. Whether `resourceLimit` is a valid
//! quantity, and whether `value` is a valid glob, is decided when the check
//! is built.

use std::fmt;
use std::path::Path;

use kmg_core::UnitFamily;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::check::Check;
use crate::error::CheckError;

/// Which block of a container's `resources` is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceValueType {
    Limits,
    Requests,
}

impl ResourceValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Limits => "limits",
            Self::Requests => "requests",
        }
    }
}

impl fmt::Display for ResourceValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options of the resource-limit check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceLimitConfig {
    /// `limits` or `requests`.
    pub resource_value_type: ResourceValueType,
    /// `cpu` or `memory`.
    pub resource_type: UnitFamily,
    /// The maximum, e.g. `2Gi` or `500m`. A bare YAML number is read as
    /// its text.
    #[serde(deserialize_with = "quantity_text")]
    pub resource_limit: String,
}

fn quantity_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_yaml::Value::deserialize(deserializer)? {
        serde_yaml::Value::String(text) => Ok(text),
        serde_yaml::Value::Number(number) => Ok(number.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a quantity string, found {other:?}"
        ))),
    }
}

/// Options of the missing-annotation check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingAnnotationConfig {
    /// Annotation key, e.g. `mycompany.io/annotation`.
    pub annotation_name: String,
    /// Glob the annotation's value must match. Any value is accepted when
    /// unset. Compiled when the check is built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// One configured check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CheckConfig {
    ResourceLimit(ResourceLimitConfig),
    MissingAnnotation(MissingAnnotationConfig),
}

/// A check file: the list of checks to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecksFile {
    pub checks: Vec<CheckConfig>,
}

impl ChecksFile {
    /// Parse a check file from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }

    /// Read and parse a check file. A file with no checks is an error.
    pub fn load(path: &Path) -> Result<Self, CheckError> {
        let text = std::fs::read_to_string(path).map_err(|source| CheckError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file = Self::from_yaml_str(&text).map_err(|source| CheckError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if file.checks.is_empty() {
            return Err(CheckError::NoChecks {
                path: path.to_path_buf(),
            });
        }
        Ok(file)
    }

    /// Build every configured check, failing on the first bad one.
    pub fn build(&self) -> Result<Vec<Check>, CheckError> {
        self.checks.iter().map(Check::from_config).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKS: &str = r#"
checks:
  - kind: resource-limit
    resourceValueType: limits
    resourceType: memory
    resourceLimit: 2Gi
  - kind: missing-annotation
    annotationName: mycompany.io/annotation
    value: "value.*"
  - kind: missing-annotation
    annotationName: mycompany.io/owner
"#;

    #[test]
    fn test_parse_check_file() {
        let file = ChecksFile::from_yaml_str(CHECKS).unwrap();
        assert_eq!(file.checks.len(), 3);
        assert_eq!(
            file.checks[0],
            CheckConfig::ResourceLimit(ResourceLimitConfig {
                resource_value_type: ResourceValueType::Limits,
                resource_type: UnitFamily::Memory,
                resource_limit: "2Gi".into(),
            })
        );
        assert_eq!(
            file.checks[1],
            CheckConfig::MissingAnnotation(MissingAnnotationConfig {
                annotation_name: "mycompany.io/annotation".into(),
                value: Some("value.*".into()),
            })
        );
        match &file.checks[2] {
            CheckConfig::MissingAnnotation(config) => assert!(config.value.is_none()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unknown_resource_type_rejected() {
        let text = "checks:\n  - kind: resource-limit\n    resourceValueType: limits\n    resourceType: gpu\n    resourceLimit: '1'\n";
        assert!(ChecksFile::from_yaml_str(text).is_err());
    }

    #[test]
    fn test_unknown_value_type_rejected() {
        let text = "checks:\n  - kind: resource-limit\n    resourceValueType: quota\n    resourceType: cpu\n    resourceLimit: '1'\n";
        assert!(ChecksFile::from_yaml_str(text).is_err());
    }

    #[test]
    fn test_numeric_limit_read_as_text() {
        let text = "checks:\n  - kind: resource-limit\n    resourceValueType: requests\n    resourceType: cpu\n    resourceLimit: 2\n";
        let file = ChecksFile::from_yaml_str(text).unwrap();
        match &file.checks[0] {
            CheckConfig::ResourceLimit(config) => assert_eq!(config.resource_limit, "2"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let text = "checks:\n  - kind: image-pull-policy\n";
        assert!(ChecksFile::from_yaml_str(text).is_err());
    }

    #[test]
    fn test_build_rejects_bad_limit() {
        let text = "checks:\n  - kind: resource-limit\n    resourceValueType: limits\n    resourceType: memory\n    resourceLimit: two gigs\n";
        let file = ChecksFile::from_yaml_str(text).unwrap();
        assert!(matches!(file.build(), Err(CheckError::InvalidLimit { .. })));
    }

    #[test]
    fn test_build_rejects_bad_glob() {
        let text = "checks:\n  - kind: missing-annotation\n    annotationName: team\n    value: \"team-[\"\n";
        let file = ChecksFile::from_yaml_str(text).unwrap();
        match file.build() {
            Err(CheckError::InvalidGlob(err)) => assert_eq!(err.pattern, "team-["),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_load_empty_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checks.yaml");
        std::fs::write(&path, "checks: []\n").unwrap();
        assert!(matches!(
            ChecksFile::load(&path),
            Err(CheckError::NoChecks { .. })
        ));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ChecksFile::load(&dir.path().join("absent.yaml")),
            Err(CheckError::Io { .. })
        ));
    }

    #[test]
    fn test_serialize_uses_option_names() {
        let file = ChecksFile::from_yaml_str(CHECKS).unwrap();
        let json = serde_json::to_value(&file).unwrap();
        assert_eq!(json["checks"][0]["kind"], "resource-limit");
        assert_eq!(json["checks"][0]["resourceValueType"], "limits");
        assert_eq!(json["checks"][1]["annotationName"], "mycompany.io/annotation");
    }
}
