//! Synchronous SQLite executor using [`rusqlite`].
//!
//! Used for embedded deployments of a WordPress-shaped schema and to run the
//! query builders against a real engine in tests.
//!
//! ```no_run
//! use lifepress::{Connection, SqliteExecutor, TablePrefix};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let executor = SqliteExecutor::open("wordpress.sqlite")?;
//! let conn = Connection::new(executor, TablePrefix::new("wp_")?);
//! # Ok(())
//! # }
//! ```

use crate::executor::{Backend, PressError, PressExecutor};
use crate::query::value_conversion::to_sqlite_values;
use crate::row::Row;
use rusqlite::{params_from_iter, Connection as SqliteConnection};
use sea_query::Values;
use std::path::Path;
use std::time::Instant;

#[cfg(feature = "metrics")]
use crate::metrics::METRICS;
#[cfg(feature = "tracing")]
use crate::metrics::tracing_helpers;

/// Implementation of `PressExecutor` for `rusqlite::Connection`
pub struct SqliteExecutor {
    conn: SqliteConnection,
}

impl SqliteExecutor {
    /// Wrap an already opened `rusqlite` connection
    pub fn new(conn: SqliteConnection) -> Self {
        Self { conn }
    }

    /// Open (or create) a database file
    ///
    /// # Errors
    ///
    /// Returns `PressError::SqliteError` if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PressError> {
        Ok(Self::new(SqliteConnection::open(path)?))
    }

    /// Open a private in-memory database
    ///
    /// # Errors
    ///
    /// Returns `PressError::SqliteError` if SQLite cannot allocate the database.
    pub fn open_in_memory() -> Result<Self, PressError> {
        Ok(Self::new(SqliteConnection::open_in_memory()?))
    }

    /// Get a reference to the underlying connection
    pub fn connection(&self) -> &SqliteConnection {
        &self.conn
    }
}

impl PressExecutor for SqliteExecutor {
    fn backend(&self) -> Backend {
        Backend::Sqlite
    }

    fn execute(&self, query: &str, values: &Values) -> Result<u64, PressError> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::execute_query_span(query).entered();
        log::debug!("execute [sqlite]: {query}");

        let start = Instant::now();
        let params = to_sqlite_values(values)?;
        let result = self
            .conn
            .execute(query, params_from_iter(params.iter()))
            .map(|n| n as u64)
            .map_err(|e| {
                #[cfg(feature = "metrics")]
                METRICS.record_query_error();
                PressError::SqliteError(e)
            });

        #[cfg(feature = "metrics")]
        METRICS.record_query(start.elapsed());
        log::trace!("execute [sqlite] took {:?}", start.elapsed());

        result
    }

    fn execute_batch(&self, query: &str) -> Result<(), PressError> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::execute_query_span(query).entered();
        log::debug!("batch [sqlite]: {query}");

        self.conn.execute_batch(query).map_err(PressError::SqliteError)
    }

    fn query_all(&self, query: &str, values: &Values) -> Result<Vec<Row>, PressError> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::execute_query_span(query).entered();
        log::debug!("query [sqlite]: {query}");

        let start = Instant::now();
        let params = to_sqlite_values(values)?;

        let mut stmt = self.conn.prepare(query).map_err(|e| {
            #[cfg(feature = "metrics")]
            METRICS.record_query_error();
            PressError::SqliteError(e)
        })?;
        let names: Vec<String> = stmt.column_names().iter().map(|n| (*n).to_string()).collect();

        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        let mut results = Vec::new();
        while let Some(row) = rows.next()? {
            results.push(Row::from_sqlite(&names, row)?);
        }

        #[cfg(feature = "metrics")]
        METRICS.record_query(start.elapsed());
        log::trace!("query [sqlite] took {:?}, {} row(s)", start.elapsed(), results.len());

        Ok(results)
    }
}
