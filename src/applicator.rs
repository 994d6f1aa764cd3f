//! File-level application of the patcher.
//!
//! This module provides the high-level pipeline the CLI and watch mode share:
//! read a file, run a patch pass, validate the result, and rewrite the file
//! atomically - but only when the pass actually changed something. A
//! read-only check mode evaluates the same pipeline without writing.

use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::edit::atomic_write;
use crate::patcher::{Patcher, RuleOutcome};
use crate::safety::SiteGuard;
use crate::validate::validate_patch;

/// Result of processing a single file.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
#[must_use = "FileReport should be checked for success/failure"]
pub enum FileReport {
    /// File needed fixes (and was rewritten, unless dry-run/check)
    Patched {
        file: PathBuf,
        fixes: usize,
        rules: Vec<RuleOutcome>,
    },
    /// File already satisfies every rule
    AlreadyCompliant { file: PathBuf },
    /// File could not be processed
    Failed { file: PathBuf, reason: String },
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileReport::Patched { file, fixes, .. } => {
                write!(f, "Patched {} ({} fixes)", file.display(), fixes)
            }
            FileReport::AlreadyCompliant { file } => {
                write!(f, "Already compliant: {}", file.display())
            }
            FileReport::Failed { file, reason } => {
                write!(f, "Failed on {}: {}", file.display(), reason)
            }
        }
    }
}

/// Full outcome of processing one file, including the buffers the CLI needs
/// for diff display. Not serialized.
#[derive(Debug)]
pub struct FileOutcome {
    pub report: FileReport,
    /// Original and patched buffers, present when the file needed fixes
    pub buffers: Option<(String, String)>,
}

/// Apply the patcher to one file.
///
/// Never returns an error: every failure mode (boundary violation, I/O,
/// parse, validation) is folded into [`FileReport::Failed`] so one bad file
/// does not abort a tree-wide run.
pub fn fix_file(patcher: &Patcher, guard: &SiteGuard, path: &Path, dry_run: bool) -> FileOutcome {
    let failed = |reason: String| FileOutcome {
        report: FileReport::Failed {
            file: path.to_path_buf(),
            reason,
        },
        buffers: None,
    };

    let canonical = match guard.validate_path(path) {
        Ok(p) => p,
        Err(e) => return failed(e.to_string()),
    };

    let original = match fs::read_to_string(&canonical) {
        Ok(c) => c,
        Err(e) => return failed(format!("read failed: {}", e)),
    };

    let outcome = match patcher.run_pass(&original) {
        Ok(o) => o,
        Err(e) => return failed(e.to_string()),
    };

    if !outcome.changed() {
        return FileOutcome {
            report: FileReport::AlreadyCompliant { file: canonical },
            buffers: None,
        };
    }

    if let Err(e) = validate_patch(&original, &outcome.html) {
        return failed(e.to_string());
    }

    if !dry_run {
        // Close the TOCTOU window before the write
        if let Err(e) = guard.revalidate(&canonical) {
            return failed(e.to_string());
        }
        if let Err(e) = atomic_write(&canonical, outcome.html.as_bytes()) {
            return failed(format!("write failed: {}", e));
        }
    }

    FileOutcome {
        report: FileReport::Patched {
            file: canonical,
            fixes: outcome.total_patched(),
            rules: outcome.rules,
        },
        buffers: Some((original, outcome.html)),
    }
}

/// Evaluate one file without writing.
///
/// Mirrors `fix_file` result semantics: `Patched` means "would be patched".
pub fn check_file(patcher: &Patcher, guard: &SiteGuard, path: &Path) -> FileOutcome {
    fix_file(patcher, guard, path, true)
}

/// Discover the HTML files under a root, skipping hidden directories and
/// dependency trees.
pub fn discover_html_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| {
            let name = entry.file_name().to_str().unwrap_or("");
            !(entry.depth() > 0 && name.starts_with('.')) && name != "node_modules"
        })
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| is_html_path(entry.path()))
        .map(|entry| entry.path().to_path_buf())
        .collect();

    files.sort();
    files
}

/// `.html` / `.htm`, case-insensitive.
pub fn is_html_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
}
