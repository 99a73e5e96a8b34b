//! Query execution methods for SelectQuery.
//!
//! This module provides execution methods (`all`, `one`, `find_one`, `first`,
//! `count`) for queries built with `SelectQuery`. Statements are rendered for
//! the connection's backend and handed to its executor; rows are hydrated
//! through `FromRow`, then the entity's always-loaded relations are attached.

use crate::executor::{PressError, PressExecutor};
use crate::model::Entity;
use crate::query::select::{render, Ident, SelectQuery};
use crate::row::Row;
use sea_query::{Asterisk, Expr, Func, OrderedStatement};

impl<'c, M, E> SelectQuery<'c, M, E>
where
    M: Entity,
    E: PressExecutor,
{
    /// Execute the query and return the raw rows
    ///
    /// # Errors
    ///
    /// Returns `PressError` if the statement fails.
    pub fn rows(&self) -> Result<Vec<Row>, PressError> {
        let (sql, values) = self.build();
        self.conn.executor().query_all(&sql, &values)
    }

    /// Execute the query and return all results
    ///
    /// # Example
    ///
    /// ```no_run
    /// use lifepress::{Connection, Entity, Post, PostBuilder, SqliteExecutor, TablePrefix};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// # let conn = Connection::new(SqliteExecutor::open_in_memory()?, TablePrefix::default());
    /// let pages = Post::query(&conn).type_("page").all()?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `PressError` if the statement fails, a row cannot be hydrated,
    /// or an always-loaded relation fails to load.
    pub fn all(self) -> Result<Vec<M>, PressError> {
        let rows = self.rows()?;
        let mut models = hydrate::<M>(&rows)?;
        if self.eager && !models.is_empty() {
            M::eager_load(&mut models, self.conn)?;
        }
        Ok(models)
    }

    /// Execute the query and return a single result
    ///
    /// Returns an error if zero or more than one row is returned.
    ///
    /// # Errors
    ///
    /// Returns `PressError::QueryError` on a cardinality mismatch, or any error
    /// from [`SelectQuery::all`].
    pub fn one(self) -> Result<M, PressError> {
        match self.find_one()? {
            Some(model) => Ok(model),
            None => Err(PressError::QueryError(format!(
                "no {} found, expected one row",
                M::NAME
            ))),
        }
    }

    /// Execute the query and return its only result, or None if no results
    ///
    /// This is similar to `one()` but returns `Option<M>` instead of an error
    /// when no rows are found. More than one row is still an error.
    ///
    /// # Errors
    ///
    /// Returns `PressError::QueryError` when more than one row matches.
    pub fn find_one(self) -> Result<Option<M>, PressError> {
        let mut models = self.all()?;
        match models.len() {
            0 => Ok(None),
            1 => Ok(models.pop()),
            n => Err(PressError::QueryError(format!(
                "expected at most one {}, got {n} rows",
                M::NAME
            ))),
        }
    }

    /// Execute the query with `LIMIT 1` and return the first result, if any
    ///
    /// # Errors
    ///
    /// Returns any error from [`SelectQuery::all`].
    pub fn first(self) -> Result<Option<M>, PressError> {
        Ok(self.limit(1).all()?.into_iter().next())
    }

    /// Count the rows matched by the query's conditions
    ///
    /// Projections and ordering are dropped; joins and filters are kept.
    ///
    /// # Errors
    ///
    /// Returns `PressError` if the statement fails or returns no count.
    pub fn count(&self) -> Result<u64, PressError> {
        let mut statement = self.query.clone();
        statement
            .clear_selects()
            .clear_order_by()
            .expr_as(Func::count(Expr::col(Asterisk)), Ident::from_static("aggregate"));

        let (sql, values) = render(&statement, self.conn.backend());
        let row = self.conn.executor().query_one(&sql, &values)?;
        row.get::<u64>("aggregate")
    }

    /// Whether any row matches the query's conditions
    ///
    /// # Errors
    ///
    /// Returns any error from [`SelectQuery::count`].
    pub fn exists(&self) -> Result<bool, PressError> {
        Ok(self.count()? > 0)
    }
}

/// Hydrate models from rows, failing on the first row that does not parse
pub(crate) fn hydrate<M: Entity>(rows: &[Row]) -> Result<Vec<M>, PressError> {
    rows.iter()
        .map(|row| {
            M::from_row(row).map_err(|e| {
                PressError::ParseError(format!("Failed to parse {} row: {e}", M::NAME))
            })
        })
        .collect()
}
