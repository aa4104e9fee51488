//! # Manifest Scanning
//!
//! Runs a fixed list of checks over manifest files. Each file may hold
//! several `---`-separated documents; each document is checked on its own.
//!
//! A file that cannot be read, or a document that cannot be parsed or
//! checked, is recorded as a failure and the batch carries on with the next
//! document or file. Directories are expanded to the `.yaml` and `.yml`
//! files beneath them, in sorted order. Each directory and file is visited
//! once, so symlink cycles end the walk instead of repeating it.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use kmg_tree::{AnnotationSet, Document, DocumentTree, NodeId};
use tracing::{debug, warn};

use crate::check::Check;
use crate::error::ScanError;
use crate::report::{Finding, ScanFailure, ScanReport};

/// Findings from one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileScan {
    /// Documents parsed and checked.
    pub documents: usize,
    pub findings: Vec<Finding>,
    /// Documents that could not be parsed or checked.
    pub failures: Vec<ScanFailure>,
}

/// A list of built checks, ready to scan files.
#[derive(Debug, Clone)]
pub struct Scanner {
    checks: Vec<Check>,
}

impl Scanner {
    pub fn new(checks: Vec<Check>) -> Self {
        Self { checks }
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Scan every file named by `paths`, expanding directories.
    ///
    /// Never fails as a whole; per-file and per-document problems are
    /// collected in [`ScanReport::failures`].
    pub fn scan_paths(&self, paths: &[PathBuf]) -> ScanReport {
        let mut report = ScanReport::default();
        let mut walk = ManifestWalk::default();
        for path in paths {
            walk.collect(path);
        }
        for err in &walk.errors {
            report.failures.push(ScanFailure::from(err));
        }

        debug!(files = walk.files.len(), checks = self.checks.len(), "scan started");
        for file in &walk.files {
            report.files_scanned += 1;
            match self.scan_file(file) {
                Ok(scan) => {
                    report.documents_scanned += scan.documents;
                    report.findings.extend(scan.findings);
                    report.failures.extend(scan.failures);
                }
                Err(err) => {
                    warn!(path = %file.display(), error = %err, "skipping file");
                    report.failures.push(ScanFailure::from(&err));
                }
            }
        }
        debug!(
            files = report.files_scanned,
            documents = report.documents_scanned,
            findings = report.findings.len(),
            failures = report.failures.len(),
            "scan finished"
        );
        report
    }

    /// Read and scan one file. Only a read error fails the whole file.
    pub fn scan_file(&self, path: &Path) -> Result<FileScan, ScanError> {
        let text = std::fs::read_to_string(path).map_err(|source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.scan_text(path, &text))
    }

    /// Scan YAML text that came from `path`, one document at a time.
    pub fn scan_text(&self, path: &Path, text: &str) -> FileScan {
        let mut scan = FileScan::default();
        for (index, parsed) in Document::parse_stream(text).into_iter().enumerate() {
            let result = parsed
                .map_err(|source| ScanError::Parse {
                    path: path.to_path_buf(),
                    document: index,
                    source,
                })
                .and_then(|document| self.scan_document(path, index, &document));
            match result {
                Ok(findings) => {
                    scan.documents += 1;
                    scan.findings.extend(findings);
                }
                Err(err) => {
                    warn!(path = %path.display(), document = index, error = %err, "skipping document");
                    scan.failures.push(ScanFailure::from(&err));
                }
            }
        }
        scan
    }

    /// Run every check over one document.
    pub fn scan_document(
        &self,
        path: &Path,
        index: usize,
        document: &Document,
    ) -> Result<Vec<Finding>, ScanError> {
        let mut findings = Vec::new();
        for check in &self.checks {
            let mut sink: AnnotationSet<NodeId> = AnnotationSet::new();
            check
                .inspect(document, &mut sink)
                .map_err(|source| ScanError::Dispatch {
                    path: path.to_path_buf(),
                    document: index,
                    check: check.name().to_string(),
                    source,
                })?;
            findings.extend(sink.into_inner().into_iter().map(|(node, annotation)| Finding {
                file: path.display().to_string(),
                document: index,
                location: document.location(node),
                value: document.scalar(node).map(str::to_string),
                check: annotation.check,
                message: annotation.message,
            }));
        }
        Ok(findings)
    }
}

fn is_manifest(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

/// Manifest files found under the scanned paths, and the directories that
/// could not be listed.
#[derive(Debug, Default)]
struct ManifestWalk {
    files: Vec<PathBuf>,
    errors: Vec<ScanError>,
    seen: HashSet<PathBuf>,
}

impl ManifestWalk {
    /// Add `path`, or every manifest under it if it is a directory. A path
    /// given explicitly is kept whatever its extension.
    fn collect(&mut self, path: &Path) {
        if path.is_dir() {
            self.walk(path);
        } else if self.first_visit(path) {
            self.files.push(path.to_path_buf());
        }
    }

    /// Returns false if `path` resolves to something already visited.
    /// Paths that cannot be resolved are kept as written so that reading
    /// them reports the error.
    fn first_visit(&mut self, path: &Path) -> bool {
        let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.seen.insert(key)
    }

    fn walk(&mut self, dir: &Path) {
        if !self.first_visit(dir) {
            debug!(dir = %dir.display(), "directory already visited");
            return;
        }
        let io_error = |source| ScanError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let entries = std::fs::read_dir(dir)
            .and_then(|entries| {
                entries
                    .map(|entry| entry.map(|e| e.path()))
                    .collect::<Result<Vec<_>, _>>()
            })
            .map_err(io_error);
        let mut entries = match entries {
            Ok(entries) => entries,
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "cannot list manifests");
                self.errors.push(err);
                return;
            }
        };
        entries.sort();
        for entry in entries {
            if entry.is_dir() {
                self.walk(&entry);
            } else if is_manifest(&entry) && self.first_visit(&entry) {
                self.files.push(entry);
            }
        }
    }
}
