//! Select query builder.
//!
//! This module provides `SelectQuery` for building type-safe queries against
//! WordPress tables. Query building methods (filter, order_by, limit, etc.)
//! are defined here, while execution methods are in the execution module.

use crate::connection::Connection;
use crate::executor::{Backend, PressExecutor};
use crate::model::Entity;
use sea_query::{
    Asterisk, ConditionalStatement, Expr, ExprTrait, Iden, IntoColumnRef, IntoCondition, IntoIden,
    Order, Query, SelectStatement, Value, Values,
};
use std::borrow::Cow;
use std::marker::PhantomData;

/// Runtime identifier (prefixed table names, aliases, column names)
///
/// Prefixed table names are only known once a connection exists, so they
/// cannot be `&'static str`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident(Cow<'static, str>);

impl Ident {
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Iden for Ident {
    fn unquoted(&self) -> &str {
        &self.0
    }
}

/// Query builder for selecting records
///
/// Returned by [`Connection::query`] and [`Entity::query`]. Every builder
/// method consumes the query and returns it, so a query has exactly one owner
/// while it is being assembled; terminal methods in the execution module run it
/// against the borrowed connection.
///
/// Construction selects `{prefix}{table}.*` and applies the entity's
/// discriminator scope, so a typed entity can never see rows of another type.
///
/// # Example
///
/// ```no_run
/// use lifepress::{Connection, Post, SqliteExecutor, TablePrefix};
/// use sea_query::{Expr, ExprTrait, Order};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let conn = Connection::new(SqliteExecutor::open_in_memory()?, TablePrefix::default());
/// let query = conn.query::<Post>();
/// let title = query.col("post_title");
/// let id = query.col("ID");
/// let posts = query
///     .filter(Expr::col(title).like("Hello%"))
///     .order_by(id, Order::Asc)
///     .limit(10)
///     .all()?;
/// # Ok(())
/// # }
/// ```
pub struct SelectQuery<'c, M, E> {
    pub(crate) conn: &'c Connection<E>,
    pub(crate) table: Ident,
    pub(crate) query: SelectStatement,
    pub(crate) eager: bool,
    _phantom: PhantomData<M>,
}

impl<'c, M, E> SelectQuery<'c, M, E>
where
    M: Entity,
    E: PressExecutor,
{
    /// Create a new select query scoped to `M`
    pub fn new(conn: &'c Connection<E>) -> Self {
        let table = Ident::new(conn.table(M::TABLE));

        let mut query = Query::select();
        query.column((table.clone(), Asterisk)).from(table.clone());

        if let Some(scope) = M::scope() {
            query.cond_where(
                Expr::col((table.clone(), Ident::from_static(scope.column))).eq(scope.value),
            );
        }

        Self {
            conn,
            table,
            query,
            eager: true,
            _phantom: PhantomData,
        }
    }

    /// Connection this query runs against
    pub fn connection(&self) -> &'c Connection<E> {
        self.conn
    }

    /// Prefixed name of the queried table
    pub fn table(&self) -> &Ident {
        &self.table
    }

    /// Column of the queried table, qualified with the table name
    pub fn col<C: IntoIden>(&self, column: C) -> (Ident, C) {
        (self.table.clone(), column)
    }

    /// Add a filter condition, AND-combined with the existing ones
    ///
    /// Accepts any type that implements `IntoCondition`, including plain
    /// expressions and `Condition::all()` / `Condition::any()` groups. A
    /// `Condition::any()` is how OR-groups are expressed: the group is
    /// parenthesised as a whole before being ANDed in.
    pub fn filter<F>(mut self, condition: F) -> Self
    where
        F: IntoCondition,
    {
        self.query.cond_where(condition.into_condition());
        self
    }

    /// Restrict a column of the queried table to a set of values
    ///
    /// An empty set matches no rows.
    pub fn where_in<C, I, V>(self, column: C, values: I) -> Self
    where
        C: IntoIden,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return self.filter(Expr::cust("1 = 0"));
        }
        let column = self.col(column);
        self.filter(Expr::col(column).is_in(values))
    }

    /// Keep rows for which `subquery` returns at least one row
    ///
    /// The subquery is expected to be correlated with the outer table through
    /// [`SelectQuery::col`].
    pub fn where_has(self, subquery: SelectStatement) -> Self {
        self.filter(Expr::exists(subquery))
    }

    /// Add an ORDER BY clause
    pub fn order_by<C: IntoColumnRef>(mut self, column: C, order: Order) -> Self {
        self.query.order_by(column, order);
        self
    }

    /// Add an ORDER BY clause on an arbitrary expression
    pub fn order_by_expr(mut self, expr: Expr, order: Order) -> Self {
        self.query.order_by_expr(expr, order);
        self
    }

    /// Project an extra expression under `alias`, next to `{table}.*`
    pub fn select_expr_as(mut self, expr: Expr, alias: Ident) -> Self {
        self.query.expr_as(expr, alias);
        self
    }

    /// Add a LIMIT clause
    pub fn limit(mut self, limit: u64) -> Self {
        self.query.limit(limit);
        self
    }

    /// Add an OFFSET clause
    pub fn offset(mut self, offset: u64) -> Self {
        self.query.offset(offset);
        self
    }

    /// Add an INNER JOIN clause
    pub fn join<C: IntoCondition>(mut self, table: Ident, on: C) -> Self {
        self.query
            .join(sea_query::JoinType::InnerJoin, table, on.into_condition());
        self
    }

    /// Add a LEFT JOIN clause
    pub fn left_join<C: IntoCondition>(mut self, table: Ident, on: C) -> Self {
        self.query
            .join(sea_query::JoinType::LeftJoin, table, on.into_condition());
        self
    }

    /// Skip the relations the entity declares as always loaded
    pub fn without_relations(mut self) -> Self {
        self.eager = false;
        self
    }

    /// The assembled statement
    pub fn statement(&self) -> &SelectStatement {
        &self.query
    }

    /// Render for the connection's backend, with bound values
    pub fn build(&self) -> (String, Values) {
        self.build_for(self.conn.backend())
    }

    /// Render for a specific backend, with bound values
    pub fn build_for(&self, backend: Backend) -> (String, Values) {
        render(&self.query, backend)
    }

    /// Render for a specific backend with values inlined (logging, debugging)
    pub fn to_sql_string(&self, backend: Backend) -> String {
        match backend {
            Backend::Postgres => self.query.to_string(sea_query::PostgresQueryBuilder),
            Backend::Sqlite => self.query.to_string(sea_query::SqliteQueryBuilder),
            Backend::MySql => self.query.to_string(sea_query::MysqlQueryBuilder),
        }
    }
}

/// Render a statement for `backend`
pub(crate) fn render(query: &SelectStatement, backend: Backend) -> (String, Values) {
    match backend {
        Backend::Postgres => query.build(sea_query::PostgresQueryBuilder),
        Backend::Sqlite => query.build(sea_query::SqliteQueryBuilder),
        Backend::MySql => query.build(sea_query::MysqlQueryBuilder),
    }
}
