//! Check configuration and scanning errors.
//!
//! Every variant names the file or value it is about, so a message can be
//! printed as-is at the end of a batch run.

use std::path::PathBuf;

use kmg_core::{GlobError, QuantityError};
use kmg_tree::{DispatchError, PathError, TreeError};
use thiserror::Error;

/// A check that cannot be built from its configuration.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The configured maximum is not a quantity of the configured resource.
    #[error("invalid resource limit {limit:?}: {source}")]
    InvalidLimit {
        /// The configured maximum as written.
        limit: String,
        /// Why it did not parse.
        source: QuantityError,
    },

    /// The configured annotation value glob does not compile.
    #[error(transparent)]
    InvalidGlob(#[from] GlobError),

    /// The annotation name or derived path is unusable.
    #[error("invalid check path: {0}")]
    Path(#[from] PathError),

    /// The check file could not be read.
    #[error("failed to read check file {path}: {source}")]
    Io {
        /// The check file.
        path: PathBuf,
        /// The underlying read error.
        source: std::io::Error,
    },

    /// The check file is not a valid check list.
    #[error("failed to parse check file {path}: {source}")]
    Parse {
        /// The check file.
        path: PathBuf,
        /// The YAML or schema error.
        source: serde_yaml::Error,
    },

    /// The check file parsed but lists no checks.
    #[error("check file {path} defines no checks")]
    NoChecks {
        /// The check file.
        path: PathBuf,
    },
}

/// A manifest file, or one document in it, that could not be scanned.
///
/// Scanning continues with the next document or file after any of these.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The file or directory could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file or directory.
        path: PathBuf,
        /// The underlying read error.
        source: std::io::Error,
    },

    /// A document is not valid YAML, or is YAML that is not a tree.
    #[error("failed to parse {path} document {document}: {source}")]
    Parse {
        /// The file holding the document.
        path: PathBuf,
        /// Position of the document in its stream.
        document: usize,
        /// Why the document was rejected.
        source: TreeError,
    },

    /// A check could not compare a value. Indicates a wiring defect.
    #[error("check {check} failed on {path} document {document}: {source}")]
    Dispatch {
        /// The file holding the document.
        path: PathBuf,
        /// Position of the document in its stream.
        document: usize,
        /// Name of the check that failed.
        check: String,
        /// The comparison error.
        source: DispatchError,
    },
}

impl ScanError {
    /// The file the error is about.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Io { path, .. } | Self::Parse { path, .. } | Self::Dispatch { path, .. } => {
                path
            }
        }
    }

    /// The document the error is about, when it is about one document.
    pub fn document(&self) -> Option<usize> {
        match self {
            Self::Io { .. } => None,
            Self::Parse { document, .. } | Self::Dispatch { document, .. } => Some(*document),
        }
    }
}
