//! # Annotation Subcommand
//!
//! A single missing-annotation check configured from flags.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use kmg_checks::{Check, MissingAnnotationCheck, MissingAnnotationConfig};

/// Arguments for the `kmg annotation` subcommand.
#[derive(Args, Debug)]
pub struct AnnotationArgs {
    /// Annotation key that must be present, e.g. mycompany.io/annotation.
    #[arg(long)]
    pub name: String,

    /// Glob the annotation value must match. Any value passes when omitted.
    #[arg(long, value_name = "GLOB")]
    pub value: Option<String>,

    /// Manifest files or directories to scan.
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,
}

/// Execute the annotation subcommand.
pub fn run_annotation(args: &AnnotationArgs, format: crate::Format) -> Result<u8> {
    let config = MissingAnnotationConfig {
        annotation_name: args.name.clone(),
        value: args.value.clone(),
    };
    let check = MissingAnnotationCheck::new(config).context("invalid --name or --value")?;
    crate::run_checks(vec![Check::from(check)], &args.paths, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Format;

    #[test]
    fn missing_annotation_exits_one() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("pod.yaml");
        std::fs::write(&manifest, "metadata:\n  name: web\n").unwrap();
        let args = AnnotationArgs {
            name: "mycompany.io/annotation".into(),
            value: None,
            paths: vec![manifest],
        };
        assert_eq!(run_annotation(&args, Format::Text).unwrap(), 1);
    }

    #[test]
    fn matching_value_exits_zero() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("pod.yaml");
        std::fs::write(
            &manifest,
            "metadata:\n  annotations:\n    mycompany.io/annotation: value.X\n",
        )
        .unwrap();
        let args = AnnotationArgs {
            name: "mycompany.io/annotation".into(),
            value: Some("value.*".into()),
            paths: vec![manifest],
        };
        assert_eq!(run_annotation(&args, Format::Text).unwrap(), 0);
    }

    #[test]
    fn empty_name_is_error() {
        let args = AnnotationArgs {
            name: String::new(),
            value: None,
            paths: vec![],
        };
        assert!(run_annotation(&args, Format::Text).is_err());
    }

    #[test]
    fn bad_value_glob_is_error() {
        let args = AnnotationArgs {
            name: "team".into(),
            value: Some("team-[".into()),
            paths: vec![],
        };
        let err = run_annotation(&args, Format::Text).unwrap_err();
        assert!(format!("{err:#}").contains("invalid glob"));
    }

    #[test]
    fn unreadable_path_exits_two() {
        let dir = tempfile::tempdir().unwrap();
        let args = AnnotationArgs {
            name: "team".into(),
            value: None,
            paths: vec![dir.path().join("absent.yaml")],
        };
        assert_eq!(run_annotation(&args, Format::Json).unwrap(), 2);
    }
}
