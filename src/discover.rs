//! Repository file discovery.
//!
//! A deterministic filesystem walk: eligible extensions only, ignore
//! directories pruned, oversized files skipped, results sorted so learning
//! runs are reproducible.

use crate::config::ScanConfig;
use crate::parse::SourceLang;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Collect every analyzable source file under `root`, in sorted order.
pub fn discover_files(root: &Path, scan: &ScanConfig) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !is_ignored_dir(entry, scan));

    for entry in walker.flatten() {
        if !entry.file_type().is_file() {
            continue;
        }
        if SourceLang::from_path(entry.path()).is_none() {
            continue;
        }
        match entry.metadata() {
            Ok(meta) if meta.len() <= scan.max_file_bytes => {
                files.push(entry.path().to_path_buf());
            }
            Ok(meta) => {
                debug!(path = %entry.path().display(), bytes = meta.len(), "skipping oversized file");
            }
            Err(_) => {}
        }
    }

    files.sort();
    files
}

fn is_ignored_dir(entry: &DirEntry, scan: &ScanConfig) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .map(|name| scan.ignore_dirs.iter().any(|d| d == name))
        .unwrap_or(false)
}
