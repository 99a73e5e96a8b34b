//! Raw SQL Helpers
//!
//! Provides convenience functions for executing raw SQL queries.
//! These helpers replicate `SeaORM`'s `find_by_statement()` and `execute_unprepared()` functionality.
//!
//! Placeholders are those of the executor's backend (`$1` for Postgres, `?` for
//! SQLite). Caller values always travel as bound `sea_query::Values`.

use crate::executor::{PressError, PressExecutor};
use crate::row::{FromRow, Row, TryFromColumn};
use sea_query::Values;

/// Execute an unprepared SQL statement
///
/// This is equivalent to `SeaORM`'s `execute_unprepared()`. It executes a raw SQL string
/// without parameter binding; several `;`-separated statements are allowed.
///
/// # Errors
///
/// Returns `PressError` if the SQL execution fails.
///
/// # Examples
///
/// ```no_run
/// use lifepress::{execute_unprepared, PressError, SqliteExecutor};
///
/// # fn main() -> Result<(), PressError> {
/// let executor = SqliteExecutor::open_in_memory()?;
/// execute_unprepared(&executor, "CREATE TABLE wp_options (option_id INTEGER PRIMARY KEY)")?;
/// # Ok(())
/// # }
/// ```
pub fn execute_unprepared<E: PressExecutor>(executor: &E, sql: &str) -> Result<(), PressError> {
    executor.execute_batch(sql)
}

/// Execute a prepared statement with parameters
///
/// Returns the number of rows affected.
///
/// # Errors
///
/// Returns `PressError` if the SQL execution fails.
///
/// # Examples
///
/// ```no_run
/// use lifepress::{execute_statement, PressError, SqliteExecutor};
/// use sea_query::{Value, Values};
///
/// # fn main() -> Result<(), PressError> {
/// let executor = SqliteExecutor::open("wordpress.sqlite")?;
/// let deleted = execute_statement(
///     &executor,
///     "DELETE FROM wp_postmeta WHERE meta_key = ?",
///     &Values(vec![Value::from("_edit_lock")]),
/// )?;
/// # Ok(())
/// # }
/// ```
pub fn execute_statement<E: PressExecutor>(
    executor: &E,
    sql: &str,
    params: &Values,
) -> Result<u64, PressError> {
    executor.execute(sql, params)
}

/// Query a single row using a raw SQL statement
///
/// # Errors
///
/// Returns `PressError` if:
/// - The query execution fails
/// - No rows are returned
/// - Multiple rows are returned
pub fn find_by_statement<E: PressExecutor>(
    executor: &E,
    sql: &str,
    params: &Values,
) -> Result<Row, PressError> {
    executor.query_one(sql, params)
}

/// Query multiple rows using a raw SQL statement
///
/// # Errors
///
/// Returns `PressError` if the query execution fails.
///
/// # Examples
///
/// ```no_run
/// use lifepress::{find_all_by_statement, PressError, SqliteExecutor};
/// use sea_query::{Value, Values};
///
/// # fn main() -> Result<(), PressError> {
/// let executor = SqliteExecutor::open("wordpress.sqlite")?;
/// let rows = find_all_by_statement(
///     &executor,
///     "SELECT option_name, option_value FROM wp_options WHERE autoload = ?",
///     &Values(vec![Value::from("yes")]),
/// )?;
/// for row in rows {
///     let name: String = row.get("option_name")?;
/// }
/// # Ok(())
/// # }
/// ```
pub fn find_all_by_statement<E: PressExecutor>(
    executor: &E,
    sql: &str,
    params: &Values,
) -> Result<Vec<Row>, PressError> {
    executor.query_all(sql, params)
}

/// Query rows and hydrate them into models
///
/// # Errors
///
/// Returns `PressError` if the query fails or a row cannot be hydrated.
pub fn find_models_by_statement<M: FromRow, E: PressExecutor>(
    executor: &E,
    sql: &str,
    params: &Values,
) -> Result<Vec<M>, PressError> {
    executor
        .query_all(sql, params)?
        .iter()
        .map(M::from_row)
        .collect()
}

/// Query a single value from a raw SQL statement
///
/// Convenience function to extract a single value from the first row's first column.
///
/// # Examples
///
/// ```no_run
/// use lifepress::{query_value, PressError, SqliteExecutor};
/// use sea_query::Values;
///
/// # fn main() -> Result<(), PressError> {
/// let executor = SqliteExecutor::open("wordpress.sqlite")?;
/// let count: i64 = query_value(&executor, "SELECT COUNT(*) FROM wp_posts", &Values(vec![]))?;
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns `PressError` if:
/// - The query execution fails
/// - No rows are returned
/// - Multiple rows are returned
/// - Value extraction/conversion fails
pub fn query_value<T, E: PressExecutor>(
    executor: &E,
    sql: &str,
    params: &Values,
) -> Result<T, PressError>
where
    T: TryFromColumn,
{
    let row = executor.query_one(sql, params)?;
    let value = row
        .value_at(0)
        .ok_or_else(|| PressError::ParseError("Failed to extract value: empty row".to_string()))?;
    T::try_from_column(value)
        .map_err(|e| PressError::ParseError(format!("Failed to extract value: {e}")))
}
