//! Tree scanning for crash dumps.
//!
//! ## Algorithm Overview
//!
//! 1. For each input root, in argument order, walk it depth-first with
//!    entries sorted by file name. Directory symlinks below a root are not
//!    followed; symlinks to regular files are.
//! 2. Canonicalize every regular file and drop paths already seen, so
//!    overlapping roots report each file once, at its first discovery.
//! 3. Read and classify each candidate's header, optionally on a bounded
//!    worker pool. Classification is an order-preserving map, so the result
//!    order never depends on the number of workers.
//!
//! Per-file read failures classify as [`DumpFormat::None`]. Missing or
//! inaccessible roots, traversal errors and files that cannot be
//! canonicalized become [`ScanWarning`]s in the report.

mod report;

use crate::detect::{classify_file, DumpFormat};
use crate::error::{Error, Result};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, trace, warn};
use walkdir::{DirEntry, WalkDir};

pub use report::{DumpEntry, ScanReport, ScanWarning, WarningKind};

/// Cooperative stop signal shared between a caller and a running scan.
///
/// Checked between files; a file whose header is already being read is
/// finished first.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the scan to stop
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// True once [`cancel`](Self::cancel) has been called
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Configuration for the scanner
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Worker threads used for classification (1 = sequential, 0 = one per CPU)
    pub jobs: usize,
    /// Stop signal checked between files
    pub cancel: CancelToken,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            jobs: 1,
            cancel: CancelToken::new(),
        }
    }
}

impl ScannerConfig {
    /// Creates a new scanner config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of classification workers
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Sets the token used to cancel the scan
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }
}

/// Walks files and directories and collects crash dumps
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    config: ScannerConfig,
}

impl Scanner {
    /// Creates a new scanner with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new scanner with custom configuration
    pub fn with_config(config: ScannerConfig) -> Self {
        Self { config }
    }

    /// Scans `roots`, each a file or a directory.
    ///
    /// Only fails if the worker pool cannot be built; everything else is
    /// recorded in the returned report.
    pub fn scan<P: AsRef<Path>>(&self, roots: &[P]) -> Result<ScanReport> {
        let mut report = ScanReport::default();
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for root in roots {
            if self.is_cancelled() {
                break;
            }

            let root = root.as_ref();
            if let Err(e) = fs::metadata(root) {
                let warning = if e.kind() == ErrorKind::NotFound {
                    ScanWarning::missing_input(root)
                } else {
                    ScanWarning::from_error(root, &Error::stat(root, e), WarningKind::InaccessibleInput)
                };
                warn!("{}", warning.message);
                report.warnings.push(warning);
                continue;
            }

            debug!("Scanning {}", root.display());
            self.collect_candidates(root, &mut seen, &mut candidates, &mut report);
        }

        debug!("Classifying {} candidate file(s)", candidates.len());
        let formats = self.classify_all(&candidates)?;

        for (path, format) in candidates.into_iter().zip(formats) {
            let Some(format) = format else {
                continue;
            };
            report.files_examined += 1;

            if format.is_dump() {
                debug!("Found {} at {}", format, path.display());
                report.dumps.push(DumpEntry { path, format });
            }
        }

        report.cancelled = self.is_cancelled();
        info!(
            "Scan {}: {} file(s) examined, {} dump(s) found, {} warning(s)",
            if report.cancelled { "cancelled" } else { "complete" },
            report.files_examined,
            report.dumps.len(),
            report.warnings.len()
        );

        Ok(report)
    }

    fn is_cancelled(&self) -> bool {
        self.config.cancel.is_cancelled()
    }

    /// Appends the not-yet-seen regular files under `root` to `candidates`
    fn collect_candidates(
        &self,
        root: &Path,
        seen: &mut HashSet<PathBuf>,
        candidates: &mut Vec<PathBuf>,
        report: &mut ScanReport,
    ) {
        let walker = WalkDir::new(root).follow_links(false).sort_by_file_name();

        for entry in walker {
            if self.is_cancelled() {
                return;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let warning = ScanWarning::walk_error(root, &err);
                    warn!("Skipping {}: {}", warning.path.display(), warning.message);
                    report.warnings.push(warning);
                    continue;
                }
            };

            if !is_regular_file(&entry) {
                continue;
            }

            let canonical = match fs::canonicalize(entry.path()) {
                Ok(path) => path,
                Err(e) => {
                    let err = Error::canonicalize(entry.path(), e);
                    debug!("Skipping: {}", err);
                    report
                        .warnings
                        .push(ScanWarning::from_error(entry.path(), &err, WarningKind::Unresolvable));
                    continue;
                }
            };

            if seen.insert(canonical.clone()) {
                candidates.push(canonical);
            } else {
                trace!("Already seen: {}", canonical.display());
            }
        }
    }

    /// Classifies `candidates` in order; `None` marks files skipped after cancellation
    fn classify_all(&self, candidates: &[PathBuf]) -> Result<Vec<Option<DumpFormat>>> {
        if self.config.jobs == 1 {
            return Ok(candidates
                .iter()
                .map(|path| self.classify_candidate(path))
                .collect());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs)
            .build()?;

        Ok(pool.install(|| {
            candidates
                .par_iter()
                .map(|path| self.classify_candidate(path))
                .collect()
        }))
    }

    fn classify_candidate(&self, path: &Path) -> Option<DumpFormat> {
        if self.is_cancelled() {
            return None;
        }
        trace!("Classifying {}", path.display());
        Some(classify_file(path))
    }
}

/// Regular files, plus symlinks that resolve to one. Symlinked directories
/// are never descended into.
fn is_regular_file(entry: &DirEntry) -> bool {
    if entry.file_type().is_file() {
        return true;
    }
    entry.path_is_symlink()
        && fs::metadata(entry.path())
            .map(|metadata| metadata.is_file())
            .unwrap_or(false)
}

/// Scans `roots` with the default configuration
pub fn scan_paths<P: AsRef<Path>>(roots: &[P]) -> Result<ScanReport> {
    Scanner::new().scan(roots)
}
