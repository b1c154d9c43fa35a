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

//! Mapping of filesystem metadata to [`FileRecord`].

use std::fs::Metadata;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use walkdir::DirEntry;

/// Metadata for a single regular file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Last access time as a Unix epoch.
    pub accessed: i64,
    /// Last status change time as a Unix epoch.
    pub changed: i64,
    /// Last modification time as a Unix epoch.
    pub modified: i64,
    /// Permission bits as a four-digit octal string, e.g. `"0644"`.
    pub permissions: String,
    /// Permission bits, e.g. `0o644`.
    pub mode: u32,
}

impl FileRecord {
    /// Builds a record from a `WalkDir` entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry's metadata cannot be read.
    pub(crate) fn from_entry(entry: &DirEntry) -> Result<Self> {
        let meta = entry
            .metadata()
            .with_context(|| format!("Cannot stat {}", entry.path().display()))?;
        let mode = permission_bits(&meta);

        Ok(Self {
            path: entry.path().to_path_buf(),
            size: meta.len(),
            accessed: epoch_of(meta.accessed().ok()),
            changed: changed_time(&meta),
            modified: epoch_of(meta.modified().ok()),
            permissions: format!("{:04o}", mode),
            mode,
        })
    }
}

/// Seconds since the Unix epoch, negative for earlier times and 0 when the
/// platform does not report the time.
fn epoch_of(time: Option<SystemTime>) -> i64 {
    let Some(time) = time else {
        return 0;
    };
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_secs()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_secs()).map_or(i64::MIN, |s| -s),
    }
}

#[cfg(unix)]
fn permission_bits(meta: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn permission_bits(meta: &Metadata) -> u32 {
    if meta.permissions().readonly() { 0o444 } else { 0o644 }
}

#[cfg(unix)]
fn changed_time(meta: &Metadata) -> i64 {
    use std::os::unix::fs::MetadataExt;
    meta.ctime()
}

#[cfg(not(unix))]
fn changed_time(meta: &Metadata) -> i64 {
    epoch_of(meta.modified().ok())
}
