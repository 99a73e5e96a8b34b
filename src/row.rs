//! Backend-neutral result rows.
//!
//! Every executor hands back [`Row`]s made of [`ColumnValue`]s so that models
//! hydrate the same way whichever driver produced them. Typed extraction goes
//! through [`TryFromColumn`], which mirrors SeaORM's `TryGetable`.

use crate::executor::PressError;
use crate::query::value_conversion::DATETIME_FORMAT;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

/// A single column value as read from the database
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColumnValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    DateTime(NaiveDateTime),
}

impl ColumnValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ColumnValue::Null)
    }

    /// Short type name used in conversion errors
    pub fn kind(&self) -> &'static str {
        match self {
            ColumnValue::Null => "null",
            ColumnValue::Int(_) => "integer",
            ColumnValue::Float(_) => "float",
            ColumnValue::Text(_) => "text",
            ColumnValue::Bytes(_) => "bytes",
            ColumnValue::DateTime(_) => "datetime",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ColumnValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ColumnValue::Int(i) => Some(*i),
            ColumnValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnValue::Null => write!(f, "NULL"),
            ColumnValue::Int(i) => write!(f, "{i}"),
            ColumnValue::Float(v) => write!(f, "{v}"),
            ColumnValue::Text(s) => write!(f, "{s}"),
            ColumnValue::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            ColumnValue::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
        }
    }
}

impl From<i64> for ColumnValue {
    fn from(v: i64) -> Self {
        ColumnValue::Int(v)
    }
}

impl From<String> for ColumnValue {
    fn from(v: String) -> Self {
        ColumnValue::Text(v)
    }
}

impl From<&str> for ColumnValue {
    fn from(v: &str) -> Self {
        ColumnValue::Text(v.to_string())
    }
}

impl From<NaiveDateTime> for ColumnValue {
    fn from(v: NaiveDateTime) -> Self {
        ColumnValue::DateTime(v)
    }
}

impl<T: Into<ColumnValue>> From<Option<T>> for ColumnValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(ColumnValue::Null, Into::into)
    }
}

/// Typed extraction from a [`ColumnValue`]
pub trait TryFromColumn: Sized {
    /// # Errors
    ///
    /// Returns `PressError::ParseError` when the value is null or of an
    /// incompatible type.
    fn try_from_column(value: &ColumnValue) -> Result<Self, PressError>;
}

fn mismatch(expected: &str, value: &ColumnValue) -> PressError {
    PressError::ParseError(format!(
        "type mismatch: expected {expected}, got {}",
        value.kind()
    ))
}

impl TryFromColumn for i64 {
    fn try_from_column(value: &ColumnValue) -> Result<Self, PressError> {
        match value {
            ColumnValue::Int(i) => Ok(*i),
            ColumnValue::Text(s) => s.trim().parse().map_err(|_| mismatch("integer", value)),
            _ => Err(mismatch("integer", value)),
        }
    }
}

impl TryFromColumn for i32 {
    fn try_from_column(value: &ColumnValue) -> Result<Self, PressError> {
        let wide = i64::try_from_column(value)?;
        i32::try_from(wide)
            .map_err(|_| PressError::ParseError(format!("integer {wide} does not fit in i32")))
    }
}

impl TryFromColumn for u64 {
    fn try_from_column(value: &ColumnValue) -> Result<Self, PressError> {
        let wide = i64::try_from_column(value)?;
        u64::try_from(wide)
            .map_err(|_| PressError::ParseError(format!("integer {wide} is negative")))
    }
}

impl TryFromColumn for f64 {
    fn try_from_column(value: &ColumnValue) -> Result<Self, PressError> {
        match value {
            ColumnValue::Float(v) => Ok(*v),
            #[allow(clippy::cast_precision_loss)]
            ColumnValue::Int(i) => Ok(*i as f64),
            _ => Err(mismatch("float", value)),
        }
    }
}

impl TryFromColumn for bool {
    fn try_from_column(value: &ColumnValue) -> Result<Self, PressError> {
        match value {
            ColumnValue::Int(i) => Ok(*i != 0),
            _ => Err(mismatch("boolean", value)),
        }
    }
}

impl TryFromColumn for String {
    fn try_from_column(value: &ColumnValue) -> Result<Self, PressError> {
        match value {
            ColumnValue::Text(s) => Ok(s.clone()),
            ColumnValue::Int(_) | ColumnValue::Float(_) | ColumnValue::DateTime(_) => {
                Ok(value.to_string())
            }
            ColumnValue::Bytes(b) => String::from_utf8(b.clone())
                .map_err(|e| PressError::ParseError(format!("invalid utf-8 text: {e}"))),
            ColumnValue::Null => Err(mismatch("text", value)),
        }
    }
}

impl TryFromColumn for NaiveDateTime {
    fn try_from_column(value: &ColumnValue) -> Result<Self, PressError> {
        match value {
            ColumnValue::DateTime(dt) => Ok(*dt),
            ColumnValue::Text(s) => NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
                .map_err(|e| PressError::ParseError(format!("invalid datetime `{s}`: {e}"))),
            _ => Err(mismatch("datetime", value)),
        }
    }
}

impl<T: TryFromColumn> TryFromColumn for Option<T> {
    fn try_from_column(value: &ColumnValue) -> Result<Self, PressError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::try_from_column(value).map(Some)
        }
    }
}

/// One result row: column names paired with their values, in select order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, ColumnValue)>,
}

impl Row {
    pub fn new(columns: Vec<(String, ColumnValue)>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Raw value by column name. When a name repeats (joined tables), the
    /// first occurrence wins.
    pub fn value(&self, column: &str) -> Option<&ColumnValue> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn value_at(&self, index: usize) -> Option<&ColumnValue> {
        self.columns.get(index).map(|(_, value)| value)
    }

    /// Typed value by column name
    ///
    /// # Errors
    ///
    /// Returns `PressError::ParseError` if the column is missing or cannot be
    /// converted to `T`.
    pub fn get<T: TryFromColumn>(&self, column: &str) -> Result<T, PressError> {
        let value = self
            .value(column)
            .ok_or_else(|| PressError::ParseError(format!("column `{column}` not found in row")))?;
        T::try_from_column(value)
            .map_err(|e| PressError::ParseError(format!("column `{column}`: {e}")))
    }

    /// Like [`Row::get`], but a missing column reads as `None`
    ///
    /// # Errors
    ///
    /// Returns `PressError::ParseError` if the column exists but cannot be
    /// converted to `T`.
    pub fn get_opt<T: TryFromColumn>(&self, column: &str) -> Result<Option<T>, PressError> {
        match self.value(column) {
            Some(_) => self.get::<Option<T>>(column),
            None => Ok(None),
        }
    }

    #[cfg(feature = "postgres")]
    pub(crate) fn from_postgres(row: &may_postgres::Row) -> Result<Self, PressError> {
        use may_postgres::types::Type;

        let mut columns = Vec::with_capacity(row.len());
        for (idx, column) in row.columns().iter().enumerate() {
            let ty = column.type_();
            let value = if *ty == Type::INT2 {
                row.try_get::<usize, Option<i16>>(idx)?
                    .map_or(ColumnValue::Null, |v| ColumnValue::Int(i64::from(v)))
            } else if *ty == Type::INT4 {
                row.try_get::<usize, Option<i32>>(idx)?
                    .map_or(ColumnValue::Null, |v| ColumnValue::Int(i64::from(v)))
            } else if *ty == Type::INT8 {
                row.try_get::<usize, Option<i64>>(idx)?
                    .map_or(ColumnValue::Null, ColumnValue::Int)
            } else if *ty == Type::BOOL {
                row.try_get::<usize, Option<bool>>(idx)?
                    .map_or(ColumnValue::Null, |v| ColumnValue::Int(i64::from(v)))
            } else if *ty == Type::FLOAT4 {
                row.try_get::<usize, Option<f32>>(idx)?
                    .map_or(ColumnValue::Null, |v| ColumnValue::Float(f64::from(v)))
            } else if *ty == Type::FLOAT8 {
                row.try_get::<usize, Option<f64>>(idx)?
                    .map_or(ColumnValue::Null, ColumnValue::Float)
            } else if *ty == Type::TIMESTAMP {
                row.try_get::<usize, Option<NaiveDateTime>>(idx)?
                    .map_or(ColumnValue::Null, ColumnValue::DateTime)
            } else if *ty == Type::BYTEA {
                row.try_get::<usize, Option<Vec<u8>>>(idx)?
                    .map_or(ColumnValue::Null, ColumnValue::Bytes)
            } else {
                row.try_get::<usize, Option<String>>(idx)?
                    .map_or(ColumnValue::Null, ColumnValue::Text)
            };
            columns.push((column.name().to_string(), value));
        }
        Ok(Self { columns })
    }

    #[cfg(feature = "sqlite")]
    pub(crate) fn from_sqlite(names: &[String], row: &rusqlite::Row<'_>) -> Result<Self, PressError> {
        use rusqlite::types::ValueRef;

        let mut columns = Vec::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            let value = match row.get_ref(idx)? {
                ValueRef::Null => ColumnValue::Null,
                ValueRef::Integer(i) => ColumnValue::Int(i),
                ValueRef::Real(v) => ColumnValue::Float(v),
                ValueRef::Text(t) => ColumnValue::Text(String::from_utf8_lossy(t).into_owned()),
                ValueRef::Blob(b) => ColumnValue::Bytes(b.to_vec()),
            };
            columns.push((name.clone(), value));
        }
        Ok(Self { columns })
    }
}

/// Trait for types that can be created from a database row
pub trait FromRow: Sized {
    /// # Errors
    ///
    /// Returns `PressError::ParseError` if a required column is missing or
    /// has an incompatible type.
    fn from_row(row: &Row) -> Result<Self, PressError>;
}
