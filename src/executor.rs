//! `PressExecutor` Module
//!
//! Provides the `PressExecutor` trait that abstracts database execution over the
//! supported drivers (`may_postgres`, `rusqlite`).
//!
//! Statements reach an executor already rendered for its [`Backend`] together
//! with their bound `sea_query::Values`; each driver converts those values into
//! its own parameter type and hands back backend-neutral [`Row`]s.

use crate::row::Row;
use sea_query::Values;
use std::fmt;

#[cfg(feature = "postgres")]
use may_postgres::{Client, Error as PostgresError};
#[cfg(feature = "postgres")]
use std::time::Instant;

#[cfg(feature = "metrics")]
use crate::metrics::METRICS;
#[cfg(feature = "tracing")]
use crate::metrics::tracing_helpers;

/// SQL dialect a statement is rendered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Backend {
    /// PostgreSQL (`$1` placeholders, double-quoted identifiers)
    Postgres,
    /// SQLite (`?` placeholders)
    Sqlite,
    /// MySQL, the native WordPress server. Rendering only, there is no executor.
    MySql,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Postgres => write!(f, "postgres"),
            Backend::Sqlite => write!(f, "sqlite"),
            Backend::MySql => write!(f, "mysql"),
        }
    }
}

/// `PressExecutor` error type
#[derive(Debug)]
pub enum PressError {
    /// `PostgreSQL` error from `may_postgres`
    #[cfg(feature = "postgres")]
    PostgresError(PostgresError),
    /// `SQLite` error from `rusqlite`
    #[cfg(feature = "sqlite")]
    SqliteError(rusqlite::Error),
    /// Query execution error
    QueryError(String),
    /// Row parsing/conversion error
    ParseError(String),
    /// Attribute not present on the model nor on any fallback relation
    UnknownAttribute {
        /// Model the lookup started from
        model: &'static str,
        /// Requested attribute name
        attribute: String,
    },
    /// Other execution errors
    Other(String),
}

impl fmt::Display for PressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "postgres")]
            PressError::PostgresError(e) => {
                write!(f, "PostgreSQL error: {e}")
            }
            #[cfg(feature = "sqlite")]
            PressError::SqliteError(e) => {
                write!(f, "SQLite error: {e}")
            }
            PressError::QueryError(s) => {
                write!(f, "Query error: {s}")
            }
            PressError::ParseError(s) => {
                write!(f, "Parse error: {s}")
            }
            PressError::UnknownAttribute { model, attribute } => {
                write!(f, "Undefined attribute `{attribute}` on {model}")
            }
            PressError::Other(s) => {
                write!(f, "Execution error: {s}")
            }
        }
    }
}

impl std::error::Error for PressError {}

#[cfg(feature = "postgres")]
impl From<PostgresError> for PressError {
    fn from(err: PostgresError) -> Self {
        PressError::PostgresError(err)
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for PressError {
    fn from(err: rusqlite::Error) -> Self {
        PressError::SqliteError(err)
    }
}

/// Trait for executing database operations
///
/// This trait abstracts database execution, allowing different drivers to be
/// used interchangeably behind a [`Connection`](crate::connection::Connection).
/// Statements are passed in the dialect reported by [`PressExecutor::backend`].
///
/// # Examples
///
/// ```no_run
/// use lifepress::{PressExecutor, PressError, SqliteExecutor};
/// use sea_query::Values;
///
/// # fn main() -> Result<(), PressError> {
/// let executor = SqliteExecutor::open_in_memory()?;
/// executor.execute_batch("CREATE TABLE wp_options (option_name TEXT)")?;
///
/// let rows = executor.query_all("SELECT option_name FROM wp_options", &Values(vec![]))?;
/// assert!(rows.is_empty());
/// # Ok(())
/// # }
/// ```
pub trait PressExecutor {
    /// Dialect this executor expects statements to be rendered in
    fn backend(&self) -> Backend;

    /// Execute a SQL statement and return the number of rows affected
    ///
    /// # Errors
    ///
    /// Returns `PressError` if the statement fails.
    fn execute(&self, query: &str, values: &Values) -> Result<u64, PressError>;

    /// Execute one or more unparameterised statements separated by `;`
    ///
    /// # Errors
    ///
    /// Returns `PressError` if any statement fails.
    fn execute_batch(&self, query: &str) -> Result<(), PressError>;

    /// Execute a query and return all rows
    ///
    /// # Errors
    ///
    /// Returns `PressError` if the query execution fails.
    fn query_all(&self, query: &str, values: &Values) -> Result<Vec<Row>, PressError>;

    /// Execute a query and return a single row
    ///
    /// # Errors
    ///
    /// Returns `PressError` if:
    /// - The query execution fails
    /// - No rows are returned
    /// - Multiple rows are returned
    fn query_one(&self, query: &str, values: &Values) -> Result<Row, PressError> {
        let mut rows = self.query_all(query, values)?;
        match rows.len() {
            1 => Ok(rows.remove(0)),
            0 => Err(PressError::QueryError(
                "query returned no rows, expected one row".to_string(),
            )),
            n => Err(PressError::QueryError(format!(
                "query returned {n} rows, expected one row"
            ))),
        }
    }
}

impl<T: PressExecutor + ?Sized> PressExecutor for &T {
    fn backend(&self) -> Backend {
        (**self).backend()
    }

    fn execute(&self, query: &str, values: &Values) -> Result<u64, PressError> {
        (**self).execute(query, values)
    }

    fn execute_batch(&self, query: &str) -> Result<(), PressError> {
        (**self).execute_batch(query)
    }

    fn query_all(&self, query: &str, values: &Values) -> Result<Vec<Row>, PressError> {
        (**self).query_all(query, values)
    }
}

/// Implementation of `PressExecutor` for `may_postgres::Client`
///
/// This is the primary executor implementation that directly uses a `may_postgres::Client`.
#[cfg(feature = "postgres")]
pub struct MayPostgresExecutor {
    client: Client,
}

#[cfg(feature = "postgres")]
impl MayPostgresExecutor {
    /// Create a new executor from a `may_postgres::Client`
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Consume the executor and return the underlying client
    pub fn into_client(self) -> Client {
        self.client
    }
}

#[cfg(feature = "postgres")]
impl PressExecutor for MayPostgresExecutor {
    fn backend(&self) -> Backend {
        Backend::Postgres
    }

    fn execute(&self, query: &str, values: &Values) -> Result<u64, PressError> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::execute_query_span(query).entered();
        log::debug!("execute [postgres]: {query}");

        let start = Instant::now();
        let result = crate::query::value_conversion::with_converted_params(values, |params| {
            self.client.execute(query, params).map_err(|e| {
                #[cfg(feature = "metrics")]
                METRICS.record_query_error();
                PressError::PostgresError(e)
            })
        });

        #[cfg(feature = "metrics")]
        METRICS.record_query(start.elapsed());
        log::trace!("execute [postgres] took {:?}", start.elapsed());

        result
    }

    fn execute_batch(&self, query: &str) -> Result<(), PressError> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::execute_query_span(query).entered();
        log::debug!("batch [postgres]: {query}");

        self.client.batch_execute(query).map_err(PressError::PostgresError)
    }

    fn query_all(&self, query: &str, values: &Values) -> Result<Vec<Row>, PressError> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::execute_query_span(query).entered();
        log::debug!("query [postgres]: {query}");

        let start = Instant::now();
        let result = crate::query::value_conversion::with_converted_params(values, |params| {
            let rows = self.client.query(query, params).map_err(|e| {
                #[cfg(feature = "metrics")]
                METRICS.record_query_error();
                PressError::PostgresError(e)
            })?;
            rows.iter().map(Row::from_postgres).collect()
        });

        #[cfg(feature = "metrics")]
        METRICS.record_query(start.elapsed());
        log::trace!("query [postgres] took {:?}", start.elapsed());

        result
    }
}
