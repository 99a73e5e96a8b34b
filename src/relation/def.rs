//! RelationDef struct for storing relationship metadata
//!
//! This module provides the `RelationDef` struct which contains all metadata about
//! entity relationships. A definition turns into a constrained `SelectQuery`
//! for the related entity, either for one parent (lazy access) or for a whole
//! result set (eager loading).

use crate::connection::Connection;
use crate::executor::PressExecutor;
use crate::model::Entity;
use crate::query::{Ident, SelectQuery};
use sea_query::{Expr, ExprTrait};

/// Type of relationship between entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationType {
    /// One-to-many relationship
    HasMany,
    /// Many-to-one relationship (belongs_to)
    BelongsTo,
    /// Many-to-many relationship through a pivot table
    BelongsToMany,
}

/// Pivot table linking both sides of a many-to-many relation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pivot {
    /// Unprefixed pivot table name
    pub table: &'static str,
    /// Pivot column holding the parent's key
    pub from_col: &'static str,
    /// Pivot column holding the related entity's key
    pub to_col: &'static str,
}

/// Defines a relationship between two entities
///
/// Table names are unprefixed; the connection's prefix is applied when a query
/// is built. The parent supplies keys taken from `from_col`, which are matched
/// against `to_col` on the related table, or against `pivot.from_col` when a
/// pivot is present (the pivot's `to_col` then joins `to_col`).
///
/// # Example
///
/// ```no_run
/// use lifepress::relation::{Pivot, RelationDef, RelationType};
///
/// // term_taxonomy -> posts through term_relationships
/// const POSTS: RelationDef = RelationDef {
///     name: "posts",
///     rel_type: RelationType::BelongsToMany,
///     from_table: "term_taxonomy",
///     from_col: "term_taxonomy_id",
///     to_table: "posts",
///     to_col: "ID",
///     pivot: Some(Pivot {
///         table: "term_relationships",
///         from_col: "term_taxonomy_id",
///         to_col: "object_id",
///     }),
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationDef {
    /// Relation name, used in logs and spans
    pub name: &'static str,
    /// Type of relationship
    pub rel_type: RelationType,
    /// Source table
    pub from_table: &'static str,
    /// Column of the source table holding the key
    pub from_col: &'static str,
    /// Target table
    pub to_table: &'static str,
    /// Column of the target table matched against the key
    pub to_col: &'static str,
    /// Pivot table, for `BelongsToMany`
    pub pivot: Option<Pivot>,
}

impl RelationDef {
    pub const fn has_many(
        name: &'static str,
        from: (&'static str, &'static str),
        to: (&'static str, &'static str),
    ) -> Self {
        Self {
            name,
            rel_type: RelationType::HasMany,
            from_table: from.0,
            from_col: from.1,
            to_table: to.0,
            to_col: to.1,
            pivot: None,
        }
    }

    pub const fn belongs_to(
        name: &'static str,
        from: (&'static str, &'static str),
        to: (&'static str, &'static str),
    ) -> Self {
        Self {
            name,
            rel_type: RelationType::BelongsTo,
            from_table: from.0,
            from_col: from.1,
            to_table: to.0,
            to_col: to.1,
            pivot: None,
        }
    }

    pub const fn belongs_to_many(
        name: &'static str,
        from: (&'static str, &'static str),
        to: (&'static str, &'static str),
        pivot: Pivot,
    ) -> Self {
        Self {
            name,
            rel_type: RelationType::BelongsToMany,
            from_table: from.0,
            from_col: from.1,
            to_table: to.0,
            to_col: to.1,
            pivot: Some(pivot),
        }
    }

    /// Column of the related query's rows that carries the parent key
    ///
    /// For pivot relations this is the projected `pivot_{from_col}` alias.
    pub fn key_column(&self) -> String {
        match self.pivot {
            Some(pivot) => format!("pivot_{}", pivot.from_col),
            None => self.to_col.to_string(),
        }
    }

    /// Related entities of a single parent
    ///
    /// The returned query still carries the related entity's own scope, so a
    /// typed target never yields rows of another discriminator.
    pub fn query_for<'c, R, E>(&self, conn: &'c Connection<E>, key: i64) -> SelectQuery<'c, R, E>
    where
        R: Entity,
        E: PressExecutor,
    {
        self.query_for_many(conn, &[key])
    }

    /// Related entities of every parent in `keys`
    pub fn query_for_many<'c, R, E>(
        &self,
        conn: &'c Connection<E>,
        keys: &[i64],
    ) -> SelectQuery<'c, R, E>
    where
        R: Entity,
        E: PressExecutor,
    {
        debug_assert_eq!(R::TABLE, self.to_table, "relation `{}` target", self.name);

        let query = SelectQuery::<R, E>::new(conn);
        match self.pivot {
            None => query.where_in(Ident::from_static(self.to_col), keys.iter().copied()),
            Some(pivot) => {
                let pivot_table = Ident::new(conn.table(pivot.table));
                let related_key = query.col(Ident::from_static(self.to_col));
                let parent_key = (pivot_table.clone(), Ident::from_static(pivot.from_col));

                let query = query
                    .join(
                        pivot_table.clone(),
                        Expr::col((pivot_table.clone(), Ident::from_static(pivot.to_col)))
                            .equals(related_key),
                    )
                    .select_expr_as(Expr::col(parent_key.clone()), Ident::new(self.key_column()));

                if keys.is_empty() {
                    query.filter(Expr::cust("1 = 0"))
                } else {
                    query.filter(Expr::col(parent_key).is_in(keys.iter().copied()))
                }
            }
        }
    }
}
