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

//! Logging.
//!
//! Library code reports diagnostics through `tracing`; applications install a
//! subscriber with [`init`] or [`init_with_level`].
//!
//! [`LogSink`] is a separate append-only text log with one severity-tagged
//! line per message:
//!
//! ```text
//! 2026-01-31,09:15:02.118 CET [ERROR] Database connection failed: ...
//! ```

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use crate::calendar::{Calendar, Zone};

const DEFAULT_FILTER: &str = "odds=info";

/// Installs a `tracing` subscriber filtered by `RUST_LOG`, falling back to
/// `info` for this crate.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

/// Installs a `tracing` subscriber at a fixed level for this crate.
pub fn init_with_level(level: Level) {
    let filter = EnvFilter::new(format!("odds={}", level));

    fmt().with_env_filter(filter).with_target(true).init();
}

/// Append-only, severity-tagged text log.
#[derive(Debug, Clone)]
pub struct LogSink {
    path: PathBuf,
    calendar: Calendar,
}

impl LogSink {
    /// Creates a sink writing to `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            calendar: Calendar::system(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one line tagged with `level`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or written.
    pub fn log(&self, level: Level, message: &str) -> io::Result<()> {
        let stamp = self
            .calendar
            .stamp(Zone::Local, None)
            .map_err(io::Error::other)?;

        // Single line per message, newlines in the message are flattened.
        let message = message.replace(['\r', '\n'], " ");
        let line = format!("{} [{}] {}\n", stamp, level, message);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }

    pub fn error(&self, message: &str) -> io::Result<()> {
        self.log(Level::ERROR, message)
    }

    pub fn warn(&self, message: &str) -> io::Result<()> {
        self.log(Level::WARN, message)
    }

    pub fn info(&self, message: &str) -> io::Result<()> {
        self.log(Level::INFO, message)
    }

    pub fn debug(&self, message: &str) -> io::Result<()> {
        self.log(Level::DEBUG, message)
    }
}
