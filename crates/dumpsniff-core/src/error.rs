//! Error types for the dumpsniff-core library.
//!
//! Per-file failures are reported through [`Error`] but the scanner treats
//! them as "not a dump" so a single bad file never aborts a tree walk.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for dumpsniff operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all dumpsniff operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failed to open or read a file header
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Path exists but is not a regular file (directory, device, socket, ...)
    #[error("not a regular file: '{path}'")]
    NotRegularFile {
        /// The offending path
        path: PathBuf,
    },

    /// Input path given to the scanner exists but cannot be inspected
    #[error("failed to access '{path}': {source}")]
    Stat {
        /// Path whose metadata could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to resolve a path to its canonical absolute form
    #[error("failed to canonicalize '{path}': {source}")]
    Canonicalize {
        /// Path that could not be resolved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Worker pool could not be created
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new not-a-regular-file error
    pub fn not_regular_file(path: impl Into<PathBuf>) -> Self {
        Self::NotRegularFile { path: path.into() }
    }

    /// Creates a new metadata access error
    pub fn stat(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Stat {
            path: path.into(),
            source,
        }
    }

    /// Creates a new canonicalization error
    pub fn canonicalize(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Canonicalize {
            path: path.into(),
            source,
        }
    }
}
