// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! File metadata listing.
//!
//! Directory traversal uses `WalkDir`, which never yields the `.` and `..`
//! entries and does not follow symbolic links. Only regular files are
//! reported; directories are traversed (when recursing) but not listed, and
//! symlinks, sockets, FIFOs and devices are skipped.
//!
//! # Failure
//!
//! A missing or unreadable directory is not an error: it produces an empty
//! listing and a warning in the log. Unreadable entries below the root are
//! skipped in the same way.

mod meta;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::{DirEntry, WalkDir};

pub use meta::FileRecord;

/// Direction for [`list_files_by_mtime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Oldest first.
    #[default]
    Ascending,
    /// Newest first.
    Descending,
}

/// A file path paired with its modification time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatedFile {
    /// Modification time as a Unix epoch.
    pub modified: i64,
    pub path: PathBuf,
}

/// Whether `path` has one of the `extensions`.
///
/// Matching ignores case and a leading dot on the filter entries, so both
/// `"log"` and `".LOG"` accept `app.log`.
fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    extensions
        .iter()
        .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
}

/// Walks `dir` and returns the regular files that pass the extension filter.
///
/// # Errors
///
/// Returns an error if the root itself cannot be read. Errors on entries
/// below the root are logged and skipped.
fn walk(dir: &Path, recursive: bool, extensions: Option<&[&str]>) -> Result<Vec<DirEntry>> {
    let root = std::fs::metadata(dir)
        .with_context(|| format!("Cannot read directory {}", dir.display()))?;
    if !root.is_dir() {
        anyhow::bail!("{} is not a directory", dir.display());
    }

    let mut walker = WalkDir::new(dir).min_depth(1).follow_links(false);
    if !recursive {
        walker = walker.max_depth(1);
    }

    let entries = walker
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| extensions.is_none_or(|exts| has_extension(entry.path(), exts)))
        .collect();

    Ok(entries)
}

/// Lists the regular files in `dir` with their size, times and permissions.
///
/// # Arguments
///
/// * `dir` - The directory to list.
/// * `recursive` - Descend into subdirectories when `true`.
/// * `extensions` - Only include files with one of these extensions; `None`
///   includes every file.
///
/// Entries whose metadata cannot be read are skipped.
pub fn list_files(dir: &Path, recursive: bool, extensions: Option<&[&str]>) -> Vec<FileRecord> {
    let entries = match walk(dir, recursive, extensions) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("{:#}", e);
            return Vec::new();
        }
    };

    entries
        .iter()
        .filter_map(|entry| match FileRecord::from_entry(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::debug!("Skipping {}: {:#}", entry.path().display(), e);
                None
            }
        })
        .collect()
}

/// Lists the regular files in `dir` ordered by modification time.
///
/// Filtering follows [`list_files`]. Files with the same modification time
/// are ordered by path, in the same direction as `order`.
pub fn list_files_by_mtime(
    dir: &Path,
    recursive: bool,
    extensions: Option<&[&str]>,
    order: SortOrder,
) -> Vec<DatedFile> {
    let mut files: Vec<DatedFile> = list_files(dir, recursive, extensions)
        .into_iter()
        .map(|record| DatedFile {
            modified: record.modified,
            path: record.path,
        })
        .collect();

    files.sort_by(|a, b| {
        let ord = a.modified.cmp(&b.modified).then_with(|| a.path.cmp(&b.path));
        match order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    });

    files
}
