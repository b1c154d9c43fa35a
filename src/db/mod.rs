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

//! Database handle.
//!
//! A thin wrapper around a single SQLite connection. The handle is created
//! explicitly from a [`DbConfig`] by [`Database::connect`] and owned by the
//! application; there is no process-wide instance.
//!
//! Connection failures are logged, to `tracing` and to an optional
//! [`LogSink`], before being returned to the caller.
//!
//! # Performance
//!
//! [`Database::prepare`] and [`Database::query`] use
//! [`rusqlite::Connection::prepare_cached`] to reduce SQL parsing overhead.

mod model;

use std::cell::RefCell;
use std::fmt;

use rusqlite::{Connection, OpenFlags, Params, Statement};
use serde::{Deserialize, Serialize};

use crate::logging::LogSink;

pub use model::QueryResult;

const SQLITE_SCHEME: &str = "sqlite:";

const MEMORY_DSN: &str = ":memory:";

const STATEMENT_CACHE_CAPACITY: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("no database DSN configured")]
    MissingDsn,

    #[error("failed to connect to '{dsn}'")]
    Connect {
        dsn: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error(transparent)]
    Sql(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, DbError>;

/// Connection settings.
///
/// The DSN is a SQLite database path, optionally prefixed with `sqlite:`.
/// `:memory:` (or `sqlite::memory:`) opens a private in-memory database.
/// The username and password are carried for callers that share this
/// configuration with other backends; SQLite does not use them.
#[derive(Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct DbConfig {
    pub dsn: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("dsn", &self.dsn)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl DbConfig {
    pub fn with_dsn(mut self, dsn: impl Into<String>) -> Self {
        self.dsn = dsn.into();
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// The database path with any `sqlite:` scheme removed.
    fn target(&self) -> &str {
        let dsn = self.dsn.trim();
        dsn.strip_prefix(SQLITE_SCHEME).unwrap_or(dsn)
    }
}

/// An open database connection.
#[derive(Debug)]
pub struct Database {
    conn: Connection,
    last_error: RefCell<Option<String>>,
}

impl Database {
    /// Opens the database described by `config`.
    ///
    /// This function performs the following setup:
    /// * **Constraints**: Enforces foreign key integrity.
    /// * **Statement cache**: Sizes the prepared statement cache.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::MissingDsn`] if no DSN is configured, or
    /// [`DbError::Connect`] if the database cannot be opened or configured.
    /// Either failure is logged first, to `sink` as well when one is given.
    pub fn connect(config: &DbConfig, sink: Option<&LogSink>) -> Result<Self> {
        Self::open(config).inspect_err(|e| report(e, sink))
    }

    fn open(config: &DbConfig) -> Result<Self> {
        let target = config.target();
        if target.is_empty() {
            return Err(DbError::MissingDsn);
        }

        let connect_err = |source| DbError::Connect {
            dsn: config.dsn.clone(),
            source,
        };

        let conn = if target == MEMORY_DSN {
            Connection::open_in_memory()
        } else {
            Connection::open_with_flags(
                target,
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
        }
        .map_err(connect_err)?;

        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(connect_err)?;
        conn.set_prepared_statement_cache_capacity(STATEMENT_CACHE_CAPACITY);

        tracing::debug!("Connected to {}", target);

        Ok(Self {
            conn,
            last_error: RefCell::new(None),
        })
    }

    /// The underlying connection, for anything this wrapper does not cover.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Prepares (and caches) a statement.
    pub fn prepare(&self, sql: &str) -> Result<rusqlite::CachedStatement<'_>> {
        self.track(self.conn.prepare_cached(sql))
    }

    /// Prepares a statement outside the cache.
    pub fn prepare_uncached(&self, sql: &str) -> Result<Statement<'_>> {
        self.track(self.conn.prepare(sql))
    }

    /// Executes a single statement and returns the number of affected rows.
    pub fn exec(&self, sql: &str) -> Result<usize> {
        self.track(self.conn.execute(sql, []))
    }

    /// Executes a batch of `;`-separated statements.
    pub fn exec_batch(&self, sql: &str) -> Result<()> {
        self.track(self.conn.execute_batch(sql))
    }

    /// Runs a query and collects every row.
    ///
    /// # Examples
    ///
    /// ```
    /// use odds::db::{Database, DbConfig};
    ///
    /// let db = Database::connect(&DbConfig::default().with_dsn(":memory:"), None).unwrap();
    /// let result = db.query("SELECT 1 AS one", []).unwrap();
    /// assert_eq!(result.columns, vec!["one"]);
    /// assert_eq!(result.rows.len(), 1);
    /// ```
    pub fn query<P: Params>(&self, sql: &str, params: P) -> Result<QueryResult> {
        let result = self
            .conn
            .prepare_cached(sql)
            .and_then(|mut stmt| QueryResult::collect(&mut stmt, params));
        self.track(result)
    }

    /// Message of the most recent failed call on this handle, if any.
    ///
    /// Successful calls do not clear it.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.borrow().clone()
    }

    /// Row id of the most recent successful `INSERT`.
    pub fn last_insert_id(&self) -> i64 {
        self.conn.last_insert_rowid()
    }

    fn track<T>(&self, result: rusqlite::Result<T>) -> Result<T> {
        result.map_err(|e| {
            self.last_error.replace(Some(e.to_string()));
            DbError::Sql(e)
        })
    }
}

/// Logs a connection failure to `tracing` and, when given, the text log.
fn report(error: &DbError, sink: Option<&LogSink>) {
    let message = format!("Database connection failed: {}", error_chain(error));
    tracing::error!("{}", message);

    if let Some(sink) = sink {
        if let Err(e) = sink.error(&message) {
            tracing::warn!("Could not write to {}: {}", sink.path().display(), e);
        }
    }
}

fn error_chain(error: &DbError) -> String {
    use std::error::Error;

    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
