//! Scan results and non-fatal warnings.

use crate::detect::DumpFormat;
use crate::error::Error;
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};

/// A file classified as a crash dump
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumpEntry {
    /// Absolute, canonical path of the dump
    #[serde(serialize_with = "serialize_path_lossy")]
    pub path: PathBuf,
    /// Detected format, never `DumpFormat::None`
    pub format: DumpFormat,
}

/// Serializes a path as a string, replacing non-UTF-8 bytes with U+FFFD
fn serialize_path_lossy<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}

/// Kind of non-fatal problem met while scanning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// An input path does not exist
    MissingInput,
    /// An input path exists but its metadata cannot be read
    InaccessibleInput,
    /// A directory entry could not be read during traversal
    WalkError,
    /// A file could not be resolved to its canonical path
    Unresolvable,
}

/// A problem that was reported and skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    /// Path the warning refers to
    pub path: PathBuf,
    /// Human-readable message
    pub message: String,
    /// Kind of warning
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a warning from a recoverable error.
    pub fn from_error(path: impl Into<PathBuf>, error: &Error, kind: WarningKind) -> Self {
        Self::new(path, error.to_string(), kind)
    }

    /// Create a missing input warning.
    pub fn missing_input(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            message: format!("path does not exist: {}", path.display()),
            path,
            kind: WarningKind::MissingInput,
        }
    }

    /// Create a traversal warning from a walkdir error.
    pub fn walk_error(root: &Path, error: &walkdir::Error) -> Self {
        let path = error.path().unwrap_or(root).to_path_buf();
        Self {
            message: error.to_string(),
            path,
            kind: WarningKind::WalkError,
        }
    }
}

/// Outcome of a scan over one or more roots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Dumps in discovery order, each canonical path at most once
    pub dumps: Vec<DumpEntry>,
    /// Recoverable problems, in the order they were met
    pub warnings: Vec<ScanWarning>,
    /// Number of distinct regular files whose header was classified
    pub files_examined: usize,
    /// True if the scan stopped early on a cancel request
    pub cancelled: bool,
}

impl ScanReport {
    /// Paths of the detected dumps, in discovery order
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.dumps.iter().map(|entry| entry.path.as_path())
    }

    /// True if no dump was found
    pub fn is_empty(&self) -> bool {
        self.dumps.is_empty()
    }
}
