//! # dumpsniff-core
//!
//! A library for recognising process crash dumps from their leading bytes,
//! independent of file names or extensions.
//!
//! Supported formats:
//! - Windows minidumps (`MDMP`)
//! - ELF core files (`e_type == ET_CORE`, either byte order)
//! - Mach-O core files (`filetype == MH_CORE`, either byte order, thin only)
//!
//! ## Architecture
//!
//! - [`header`]: bounded reads of a file's first bytes
//! - [`detect`]: per-format detectors and the classifier
//! - [`scanner`]: file and directory tree scanning with deduplication
//! - [`error`]: error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use dumpsniff_core::{DumpFormat, Scanner, ScannerConfig};
//!
//! let scanner = Scanner::with_config(ScannerConfig::new().jobs(4));
//! let report = scanner.scan(&["/var/crash", "/tmp/core.1234"])?;
//!
//! for dump in &report.dumps {
//!     println!("{} ({})", dump.path.display(), dump.format);
//! }
//!
//! assert_eq!(dumpsniff_core::classify_bytes(b"MDMP"), DumpFormat::Minidump);
//! # Ok::<(), dumpsniff_core::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod detect;
pub mod error;
pub mod header;
pub mod scanner;

// Re-export primary types for convenience
pub use detect::{classify, classify_bytes, classify_file, try_classify_file, DumpFormat, Endianness};
pub use error::{Error, Result};
pub use header::{ByteHeader, HEADER_CAPACITY};
pub use scanner::{
    scan_paths, CancelToken, DumpEntry, ScanReport, ScanWarning, Scanner, ScannerConfig,
    WarningKind,
};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
