//! File layer around [`format_with_options`](crate::format_with_options):
//! format one file into a `_formatted` sibling, format every HTML file of a
//! directory, and promote `_formatted` outputs over their originals.
//!
//! Batch operations never stop at the first bad file; failures are logged
//! and collected in the returned [`Report`].

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::{format_with_options, Options};

/// Appended to the file stem of a formatted output.
pub const FORMATTED_SUFFIX: &str = "_formatted";

const HTML_EXTENSIONS: [&str; 2] = ["html", "htm"];

/// Outcome of a batch operation.
#[derive(Debug, Default)]
pub struct Report {
    /// Inputs formatted, or originals replaced (would be, on a dry run).
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<Failure>,
}

#[derive(Debug)]
pub struct Failure {
    pub path: PathBuf,
    pub error: Error,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    fn fail(&mut self, path: PathBuf, error: Error) {
        tracing::warn!("{error}");
        self.failed.push(Failure { path, error });
    }
}

/// A formatted output and the original it replaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Promotion {
    pub formatted: PathBuf,
    pub original: PathBuf,
}

/* =============================== Paths =================================== */

/// `.html` or `.htm`, any case.
pub fn is_html_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| HTML_EXTENSIONS.iter().any(|h| e.eq_ignore_ascii_case(h)))
}

fn is_formatted_output(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.len() > FORMATTED_SUFFIX.len() && s.ends_with(FORMATTED_SUFFIX))
}

/// `dir/page.html` → `dir/page_formatted.html`.
pub fn formatted_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.file_stem().unwrap_or_default());
    name.push(FORMATTED_SUFFIX);
    name.push(".");
    name.push(input.extension().unwrap_or("html".as_ref()));
    input.with_file_name(name)
}

/// `dir/page_formatted.html` → `dir/page.html`; `None` without the suffix.
pub fn original_path(formatted: &Path) -> Option<PathBuf> {
    let stem = formatted.file_stem()?.to_str()?;
    let original = stem.strip_suffix(FORMATTED_SUFFIX).filter(|s| !s.is_empty())?;
    let mut name = OsString::from(original);
    if let Some(ext) = formatted.extension() {
        name.push(".");
        name.push(ext);
    }
    Some(formatted.with_file_name(name))
}

/* ============================== Single file ============================== */

/// Read `path` as UTF-8 text.
pub fn read_document(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_document(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Format `input` into `output`, or into its `_formatted` sibling when no
/// output is given. Returns the path written.
pub fn deminify_file(input: &Path, output: Option<&Path>, options: &Options) -> Result<PathBuf> {
    let document = read_document(input)?;
    let formatted = format_with_options(&document, options);
    let target = output.map_or_else(|| formatted_path(input), Path::to_path_buf);
    write_document(&target, &formatted)?;
    tracing::debug!(
        input = %input.display(),
        output = %target.display(),
        "wrote formatted document"
    );
    Ok(target)
}

/* ================================ Batches ================================ */

fn check_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Err(Error::MissingDirectory(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }
    Ok(())
}

/// Files found under a directory, and the subdirectories that could not be
/// listed.
#[derive(Debug, Default)]
struct Scan {
    files: Vec<PathBuf>,
    skipped: Vec<Failure>,
}

/// List `dir`. Failing to open `dir` itself is an error; trouble with an
/// entry or a subdirectory is recorded in `found.skipped` and the walk goes
/// on.
fn walk(dir: &Path, recursive: bool, keep: &dyn Fn(&Path) -> bool, found: &mut Scan) -> Result<()> {
    let walk_err = |source: std::io::Error| Error::Walk {
        path: dir.to_path_buf(),
        source,
    };
    for entry in fs::read_dir(dir).map_err(walk_err)? {
        let (path, file_type) = match entry.and_then(|e| e.file_type().map(|t| (e.path(), t))) {
            Ok(entry) => entry,
            Err(source) => {
                skip(found, dir.to_path_buf(), walk_err(source));
                continue;
            }
        };
        if file_type.is_dir() {
            if recursive {
                descend(&path, keep, found);
            }
        } else if keep(&path) {
            found.files.push(path);
        }
    }
    Ok(())
}

fn descend(dir: &Path, keep: &dyn Fn(&Path) -> bool, found: &mut Scan) {
    if let Err(error) = walk(dir, true, keep, found) {
        skip(found, dir.to_path_buf(), error);
    }
}

fn skip(found: &mut Scan, path: PathBuf, error: Error) {
    tracing::warn!("skipping: {error}");
    found.skipped.push(Failure { path, error });
}

fn scan(dir: &Path, recursive: bool, keep: &dyn Fn(&Path) -> bool) -> Result<Scan> {
    check_dir(dir)?;
    let mut found = Scan::default();
    walk(dir, recursive, keep, &mut found)?;
    found.files.sort();
    Ok(found)
}

fn scan_html(dir: &Path, recursive: bool) -> Result<Scan> {
    scan(dir, recursive, &|p: &Path| {
        is_html_file(p) && !is_formatted_output(p)
    })
}

/// HTML files under `dir`, sorted. Earlier `_formatted` outputs are skipped,
/// and so are subdirectories that cannot be read (with a warning).
pub fn collect_html_files(dir: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    Ok(scan_html(dir, recursive)?.files)
}

/// Format every HTML file under `dir` into its `_formatted` sibling.
/// Unreadable subdirectories show up as failures in the report.
pub fn deminify_directory(dir: &Path, recursive: bool, options: &Options) -> Result<Report> {
    let Scan { files, skipped } = scan_html(dir, recursive)?;
    if files.is_empty() {
        tracing::info!("no HTML files found in {}", dir.display());
    } else {
        tracing::info!("found {} HTML files to process", files.len());
    }

    let mut report = Report {
        failed: skipped,
        ..Report::default()
    };
    for file in files {
        match deminify_file(&file, None, options) {
            Ok(output) => {
                tracing::info!("formatted {} -> {}", file.display(), output.display());
                report.succeeded.push(file);
            }
            Err(error) => report.fail(file, error),
        }
    }
    Ok(report)
}

fn scan_formatted(dir: &Path) -> Result<(Vec<Promotion>, Vec<Failure>)> {
    let Scan { files, skipped } = scan(dir, true, &|p: &Path| {
        is_html_file(p) && is_formatted_output(p)
    })?;
    let promotions = files
        .into_iter()
        .filter_map(|formatted| {
            let original = original_path(&formatted)?;
            Some(Promotion { formatted, original })
        })
        .collect();
    Ok((promotions, skipped))
}

/// Every `*_formatted.html` (or `.htm`) under `dir`, recursively, sorted.
pub fn find_formatted_files(dir: &Path) -> Result<Vec<Promotion>> {
    Ok(scan_formatted(dir)?.0)
}

/// Rename every formatted output over its original. The rename replaces the
/// original in one step. With `dry_run`, only log what would happen.
pub fn promote_formatted(dir: &Path, dry_run: bool) -> Result<Report> {
    let (promotions, skipped) = scan_formatted(dir)?;
    if promotions.is_empty() {
        tracing::info!("no {FORMATTED_SUFFIX} files found in {}", dir.display());
    }

    let mut report = Report {
        failed: skipped,
        ..Report::default()
    };
    for Promotion { formatted, original } in promotions {
        if dry_run {
            let verb = if original.exists() { "replace" } else { "create" };
            tracing::info!("would {verb}: {} <- {}", original.display(), formatted.display());
            report.succeeded.push(original);
            continue;
        }
        match fs::rename(&formatted, &original) {
            Ok(()) => {
                tracing::info!("replaced {}", original.display());
                report.succeeded.push(original);
            }
            Err(source) => {
                let error = Error::Promote {
                    from: formatted.clone(),
                    to: original,
                    source,
                };
                report.fail(formatted, error);
            }
        }
    }
    Ok(report)
}
