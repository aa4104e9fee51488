//! # Scan Reports
//!
//! Findings collected from a batch of manifest files, and the two ways they
//! are printed.
//!
//! Text output has one line per finding or failure followed by a summary:
//!
//! ```text
//! FAIL: pod.yaml[0] spec.containers[0].resources.limits.memory = "256m": exceeds maximum of 64M (resource-limit)
//! ERROR: stream.yaml[1]: failed to parse stream.yaml document 1: invalid YAML: ...
//! Scanned 2 file(s), 1 document(s): 1 finding(s), 1 error(s)
//! ```
//!
//! JSON output is the serialized [`ScanReport`].

use std::fmt::Write as _;

use serde::Serialize;

use crate::error::ScanError;

/// One annotated node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// File the document came from.
    pub file: String,
    /// Position of the document in its `---`-separated stream.
    pub document: usize,
    /// Readable location of the node, e.g. `metadata.annotations`.
    pub location: String,
    /// Scalar text at the node, if it is a scalar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Name of the check that produced the finding.
    pub check: String,
    /// What is wrong, e.g. `exceeds maximum of 64M` or `missing:team`.
    pub message: String,
}

/// A file, or one document of a file, that could not be scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanFailure {
    /// File or directory the failure is about.
    pub file: String,
    /// Position of the failed document, when only one document failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<usize>,
    /// The error message.
    pub error: String,
}

impl From<&ScanError> for ScanFailure {
    fn from(err: &ScanError) -> Self {
        Self {
            file: err.path().display().to_string(),
            document: err.document(),
            error: err.to_string(),
        }
    }
}

/// Result of scanning a batch of files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    /// Manifest files attempted, including ones that failed.
    pub files_scanned: usize,
    /// Documents parsed and checked.
    pub documents_scanned: usize,
    pub findings: Vec<Finding>,
    pub failures: Vec<ScanFailure>,
}

impl ScanReport {
    /// Returns true if nothing was found and every file was scanned.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty() && self.failures.is_empty()
    }

    /// Process exit code for this report: 0 clean, 1 findings, 2 failures.
    pub fn exit_code(&self) -> u8 {
        if !self.failures.is_empty() {
            2
        } else if !self.findings.is_empty() {
            1
        } else {
            0
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for f in &self.findings {
            let _ = write!(out, "FAIL: {}[{}] {}", f.file, f.document, f.location);
            if let Some(value) = &f.value {
                let _ = write!(out, " = {value:?}");
            }
            let _ = writeln!(out, ": {} ({})", f.message, f.check);
        }
        for failure in &self.failures {
            let _ = match failure.document {
                Some(document) => writeln!(
                    out,
                    "ERROR: {}[{}]: {}",
                    failure.file, document, failure.error
                ),
                None => writeln!(out, "ERROR: {}: {}", failure.file, failure.error),
            };
        }
        let _ = writeln!(
            out,
            "Scanned {} file(s), {} document(s): {} finding(s), {} error(s)",
            self.files_scanned,
            self.documents_scanned,
            self.findings.len(),
            self.failures.len()
        );
        out
    }

    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// How a report is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn render(&self, report: &ScanReport) -> serde_json::Result<String> {
        match self {
            Self::Text => Ok(report.render_text()),
            Self::Json => report.render_json(),
        }
    }
}
