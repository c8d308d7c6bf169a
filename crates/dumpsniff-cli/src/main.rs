//! dumpsniff - Find crash dumps in files and directory trees
//!
//! Classifies every regular file under the given paths by its leading bytes
//! and prints the absolute paths of Windows minidumps, ELF cores and Mach-O
//! cores as a JSON array on stdout.

use anyhow::{Context, Result};
use clap::Parser;
use dumpsniff_core::{DumpEntry, ScanReport, Scanner, ScannerConfig};
use serde::Serialize;
use std::borrow::Cow;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

/// Find crash dumps (minidump, ELF core, Mach-O core) by their file headers
#[derive(Parser, Debug)]
#[command(name = "dumpsniff")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Files or directories to scan (directories are searched recursively)
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Emit `{"path", "format"}` objects instead of bare paths
    #[arg(long)]
    with_format: bool,

    /// Print the JSON on a single line
    #[arg(long)]
    compact: bool,

    /// Worker threads for classification (0 = one per CPU)
    #[arg(short, long, default_value = "1")]
    jobs: usize,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// One element of the output array.
///
/// Paths that are not valid UTF-8 are written with U+FFFD replacement
/// characters rather than failing the whole array.
#[derive(Serialize)]
#[serde(untagged)]
enum OutputEntry<'a> {
    Path(Cow<'a, str>),
    Tagged(&'a DumpEntry),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing on stderr so stdout stays valid JSON
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = ScannerConfig::new().jobs(cli.jobs);
    let report = Scanner::with_config(config)
        .scan(&cli.paths)
        .context("Scan failed")?;

    debug!(
        "{} dump(s) out of {} file(s)",
        report.dumps.len(),
        report.files_examined
    );

    let json = render(&report, cli.with_format, cli.compact)?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", json).context("Failed to write results to stdout")?;

    Ok(())
}

/// Render the detected dumps as a JSON array
fn render(report: &ScanReport, with_format: bool, compact: bool) -> Result<String> {
    let entries: Vec<OutputEntry<'_>> = report
        .dumps
        .iter()
        .map(|dump| {
            if with_format {
                OutputEntry::Tagged(dump)
            } else {
                OutputEntry::Path(dump.path.to_string_lossy())
            }
        })
        .collect();

    let json = if compact {
        serde_json::to_string(&entries)
    } else {
        serde_json::to_string_pretty(&entries)
    };

    json.context("Failed to serialize results")
}

#[cfg(test)]
mod tests {
    use super::*;
    use dumpsniff_core::DumpFormat;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn report() -> ScanReport {
        ScanReport {
            dumps: vec![
                DumpEntry {
                    path: PathBuf::from("/crash/a.dmp"),
                    format: DumpFormat::Minidump,
                },
                DumpEntry {
                    path: PathBuf::from("/crash/core.42"),
                    format: DumpFormat::MachOCore,
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_render_paths() {
        let json = render(&report(), false, true).unwrap();
        assert_eq!(json, r#"["/crash/a.dmp","/crash/core.42"]"#);
    }

    #[test]
    fn test_render_pretty_uses_two_space_indent() {
        let json = render(&report(), false, false).unwrap();
        assert_eq!(json, "[\n  \"/crash/a.dmp\",\n  \"/crash/core.42\"\n]");
    }

    #[test]
    fn test_render_with_format() {
        let json = render(&report(), true, true).unwrap();
        assert_eq!(
            json,
            r#"[{"path":"/crash/a.dmp","format":"minidump"},{"path":"/crash/core.42","format":"macho_core"}]"#
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&ScanReport::default(), false, true).unwrap(), "[]");
        assert_eq!(render(&ScanReport::default(), true, false).unwrap(), "[]");
    }

    #[test]
    fn test_render_scanned_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("crash.dmp"), b"MDMP").unwrap();
        fs::write(dir.path().join("notes.txt"), b"nothing here").unwrap();

        let report = Scanner::new().scan(&[dir.path()]).unwrap();
        let json = render(&report, false, true).unwrap();
        let parsed: Vec<PathBuf> = serde_json::from_str(&json).unwrap();

        let expected = fs::canonicalize(dir.path().join("crash.dmp")).unwrap();
        assert_eq!(parsed, vec![expected]);
    }

    // APFS rejects non-UTF-8 file names, so only Linux can create one
    #[cfg(target_os = "linux")]
    #[test]
    fn test_render_survives_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(OsStr::from_bytes(b"core\xff.dmp")), b"MDMP").unwrap();
        fs::write(dir.path().join("good.dmp"), b"MDMP").unwrap();

        let report = Scanner::new().scan(&[dir.path()]).unwrap();
        assert_eq!(report.dumps.len(), 2);

        let base = fs::canonicalize(dir.path()).unwrap();
        let lossy = base.join("core\u{fffd}.dmp").to_string_lossy().into_owned();
        let good = base.join("good.dmp").to_string_lossy().into_owned();

        let parsed: Vec<String> = serde_json::from_str(&render(&report, false, false).unwrap()).unwrap();
        assert_eq!(parsed, vec![lossy.clone(), good.clone()]);

        let tagged: Vec<serde_json::Value> =
            serde_json::from_str(&render(&report, true, true).unwrap()).unwrap();
        assert_eq!(tagged[0]["path"], lossy);
        assert_eq!(tagged[1]["path"], good);
        assert_eq!(tagged[0]["format"], "minidump");
    }

    #[test]
    fn test_paths_required() {
        let err = Cli::try_parse_from(["dumpsniff"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from(["dumpsniff", "-j", "4", "--with-format", "a", "b"]).unwrap();
        assert_eq!(cli.paths, vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(cli.jobs, 4);
        assert!(cli.with_format);
        assert!(!cli.compact);
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
