//! Value conversion utilities from SeaQuery values to driver parameters.
//!
//! The Postgres conversion follows a two-pass pattern:
//! 1. First pass: collect all values into typed vectors
//! 2. Second pass: create references to the stored values
//!
//! This pattern ensures that references remain valid within the closure scope.
//! SQLite takes owned `rusqlite` values, so a single pass suffices there.

use crate::executor::PressError;
use chrono::NaiveDateTime;
use sea_query::Value;

/// Storage format WordPress uses for `DATETIME` columns
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Convert SeaQuery values to may_postgres ToSql parameters.
///
/// Executes `f` with the converted parameters; the references handed to `f`
/// are only valid for the duration of the call.
///
/// # Errors
///
/// Returns `PressError::Other` if an unsupported value type is encountered.
#[cfg(feature = "postgres")]
pub fn with_converted_params<F, R>(values: &sea_query::Values, f: F) -> Result<R, PressError>
where
    F: FnOnce(&[&dyn may_postgres::types::ToSql]) -> Result<R, PressError>,
{
    use may_postgres::types::ToSql;

    let mut bools: Vec<bool> = Vec::new();
    let mut ints: Vec<i32> = Vec::new();
    let mut big_ints: Vec<i64> = Vec::new();
    let mut strings: Vec<String> = Vec::new();
    let mut bytes: Vec<Vec<u8>> = Vec::new();
    let mut doubles: Vec<f64> = Vec::new();
    let mut datetimes: Vec<NaiveDateTime> = Vec::new();
    let mut nulls: Vec<Option<i32>> = Vec::new();

    // First pass: collect all values into typed vectors
    for value in values.iter() {
        match value {
            Value::Bool(Some(b)) => bools.push(*b),
            Value::TinyInt(Some(i)) => ints.push(i32::from(*i)),
            Value::SmallInt(Some(i)) => ints.push(i32::from(*i)),
            Value::Int(Some(i)) => ints.push(*i),
            Value::BigInt(Some(i)) => big_ints.push(*i),
            Value::Unsigned(Some(u)) => big_ints.push(i64::from(*u)),
            Value::BigUnsigned(Some(u)) => big_ints.push(i64::try_from(*u).map_err(|_| {
                PressError::Other(format!(
                    "BigUnsigned value {u} exceeds i64::MAX, cannot be safely cast to i64"
                ))
            })?),
            Value::Double(Some(d)) => doubles.push(*d),
            Value::String(Some(s)) => strings.push(s.to_string()),
            Value::Bytes(Some(b)) => bytes.push(b.to_vec()),
            Value::ChronoDateTime(Some(dt)) => {
                let dt: &NaiveDateTime = dt;
                datetimes.push(*dt);
            }
            other if is_null(other) => nulls.push(None),
            other => {
                return Err(PressError::Other(format!(
                    "Unsupported value type in query: {other:?}"
                )));
            }
        }
    }

    // Second pass: create references to the stored values
    let (mut bool_idx, mut int_idx, mut big_int_idx, mut string_idx) = (0, 0, 0, 0);
    let (mut byte_idx, mut double_idx, mut datetime_idx, mut null_idx) = (0, 0, 0, 0);

    let mut params: Vec<&dyn ToSql> = Vec::with_capacity(values.iter().count());

    for value in values.iter() {
        match value {
            Value::Bool(Some(_)) => {
                params.push(&bools[bool_idx] as &dyn ToSql);
                bool_idx += 1;
            }
            Value::TinyInt(Some(_)) | Value::SmallInt(Some(_)) | Value::Int(Some(_)) => {
                params.push(&ints[int_idx] as &dyn ToSql);
                int_idx += 1;
            }
            Value::BigInt(Some(_)) | Value::Unsigned(Some(_)) | Value::BigUnsigned(Some(_)) => {
                params.push(&big_ints[big_int_idx] as &dyn ToSql);
                big_int_idx += 1;
            }
            Value::Double(Some(_)) => {
                params.push(&doubles[double_idx] as &dyn ToSql);
                double_idx += 1;
            }
            Value::String(Some(_)) => {
                params.push(&strings[string_idx] as &dyn ToSql);
                string_idx += 1;
            }
            Value::Bytes(Some(_)) => {
                params.push(&bytes[byte_idx] as &dyn ToSql);
                byte_idx += 1;
            }
            Value::ChronoDateTime(Some(_)) => {
                params.push(&datetimes[datetime_idx] as &dyn ToSql);
                datetime_idx += 1;
            }
            _ => {
                params.push(&nulls[null_idx] as &dyn ToSql);
                null_idx += 1;
            }
        }
    }

    f(&params)
}

/// Convert SeaQuery values to owned `rusqlite` values.
///
/// Datetimes are bound as `YYYY-MM-DD HH:MM:SS` text, which is how WordPress
/// stores them and what makes lexical comparison in SQLite chronological.
///
/// # Errors
///
/// Returns `PressError::Other` if an unsupported value type is encountered.
#[cfg(feature = "sqlite")]
pub fn to_sqlite_values(values: &sea_query::Values) -> Result<Vec<rusqlite::types::Value>, PressError> {
    use rusqlite::types::Value as SqliteValue;

    values
        .iter()
        .map(|value| {
            Ok(match value {
                Value::Bool(Some(b)) => SqliteValue::Integer(i64::from(*b)),
                Value::TinyInt(Some(i)) => SqliteValue::Integer(i64::from(*i)),
                Value::SmallInt(Some(i)) => SqliteValue::Integer(i64::from(*i)),
                Value::Int(Some(i)) => SqliteValue::Integer(i64::from(*i)),
                Value::BigInt(Some(i)) => SqliteValue::Integer(*i),
                Value::Unsigned(Some(u)) => SqliteValue::Integer(i64::from(*u)),
                Value::BigUnsigned(Some(u)) => {
                    SqliteValue::Integer(i64::try_from(*u).map_err(|_| {
                        PressError::Other(format!(
                            "BigUnsigned value {u} exceeds i64::MAX, cannot be bound in SQLite"
                        ))
                    })?)
                }
                Value::Double(Some(d)) => SqliteValue::Real(*d),
                Value::String(Some(s)) => SqliteValue::Text(s.to_string()),
                Value::Bytes(Some(b)) => SqliteValue::Blob(b.to_vec()),
                Value::ChronoDateTime(Some(dt)) => {
                    let dt: &NaiveDateTime = dt;
                    SqliteValue::Text(dt.format(DATETIME_FORMAT).to_string())
                }
                other if is_null(other) => SqliteValue::Null,
                other => {
                    return Err(PressError::Other(format!(
                        "Unsupported value type in query: {other:?}"
                    )))
                }
            })
        })
        .collect()
}

fn is_null(value: &Value) -> bool {
    matches!(
        value,
        Value::Bool(None)
            | Value::TinyInt(None)
            | Value::SmallInt(None)
            | Value::Int(None)
            | Value::BigInt(None)
            | Value::Unsigned(None)
            | Value::BigUnsigned(None)
            | Value::Double(None)
            | Value::String(None)
            | Value::Bytes(None)
            | Value::ChronoDateTime(None)
    )
}
