//! WordPress entities and the base model traits.
//!
//! Every entity is a read-only projection of one WordPress table:
//!
//! - [`Post`] / [`PostMeta`] on `posts` / `postmeta`
//! - [`Term`] / [`TermMeta`] on `terms` / `termmeta`
//! - [`Taxonomy`] on `term_taxonomy`, plus the typed [`Category`], [`Tag`] and [`Menu`]
//! - [`MenuItem`] on `posts`, scoped to `nav_menu_item`
//!
//! [`Entity`] is the base model: table, primary key, discriminator scope and
//! always-loaded relations. [`Attributes`] gives name-based field access.

use crate::connection::Connection;
use crate::executor::{PressError, PressExecutor};
use crate::query::{Ident, SelectQuery};
use crate::row::{ColumnValue, FromRow, Row, TryFromColumn};
use chrono::NaiveDateTime;
use sea_query::{Expr, ExprTrait};

/// Declare a column enum usable wherever SeaQuery expects an identifier
macro_rules! columns {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $column:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $column),+
                }
            }
        }

        impl sea_query::Iden for $name {
            fn unquoted(&self) -> &str {
                self.as_str()
            }
        }
    };
}

mod menu;
mod post;
mod taxonomy;
mod term;

pub use menu::{Menu, MenuItem};
pub use post::{Post, PostColumn, PostMeta, PostMetaColumn};
pub use taxonomy::{Category, Tag, Taxonomy, TaxonomyColumn};
pub use term::{RelationshipColumn, Term, TermColumn, TermMeta, TermMetaColumn};

/// Column/value pair every query of an entity is restricted to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discriminator {
    pub column: &'static str,
    pub value: &'static str,
}

/// Base model trait
///
/// Implemented by every entity. Provides the table mapping plus the
/// associated query entry points.
///
/// # Example
///
/// ```no_run
/// use lifepress::{Connection, Entity, Post, SqliteExecutor, TablePrefix};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// # let conn = Connection::new(SqliteExecutor::open_in_memory()?, TablePrefix::default());
/// if let Some(post) = Post::find(&conn, 42)? {
///     println!("{}", post.post_title);
/// }
/// # Ok(())
/// # }
/// ```
pub trait Entity: FromRow + Sized {
    /// Unprefixed table name
    const TABLE: &'static str;
    /// Primary key column
    const PRIMARY_KEY: &'static str;
    /// Human-readable model name used in errors
    const NAME: &'static str;

    /// Restriction ANDed into every query of this entity
    fn scope() -> Option<Discriminator> {
        None
    }

    /// Primary key value
    fn id(&self) -> i64;

    /// Attach the relations this entity always loads
    ///
    /// Called by [`SelectQuery::all`] unless the query opted out with
    /// [`SelectQuery::without_relations`].
    ///
    /// # Errors
    ///
    /// Returns `PressError` if a relation query fails.
    fn eager_load<E: PressExecutor>(
        _models: &mut [Self],
        _conn: &Connection<E>,
    ) -> Result<(), PressError> {
        Ok(())
    }

    /// Start a query for this entity
    fn query<E: PressExecutor>(conn: &Connection<E>) -> SelectQuery<'_, Self, E> {
        SelectQuery::new(conn)
    }

    /// Find by primary key, inside the entity's scope
    ///
    /// # Errors
    ///
    /// Returns `PressError` if the query fails.
    fn find<E: PressExecutor>(conn: &Connection<E>, id: i64) -> Result<Option<Self>, PressError> {
        let query = Self::query(conn);
        let pk = query.col(Ident::from_static(Self::PRIMARY_KEY));
        query.filter(Expr::col(pk).eq(id)).first()
    }

    /// Every row of this entity
    ///
    /// # Errors
    ///
    /// Returns `PressError` if the query fails.
    fn all<E: PressExecutor>(conn: &Connection<E>) -> Result<Vec<Self>, PressError> {
        Self::query(conn).all()
    }
}

/// Name-based attribute access
pub trait Attributes {
    /// Model name reported when an attribute is missing
    const MODEL: &'static str;

    /// Value of `name`, or `None` when the model has no such attribute
    ///
    /// A present attribute holding SQL NULL reads as `Some(ColumnValue::Null)`.
    fn attribute(&self, name: &str) -> Option<ColumnValue>;

    /// Like [`Attributes::attribute`], but a missing attribute is an error
    ///
    /// # Errors
    ///
    /// Returns `PressError::UnknownAttribute` when the attribute does not exist.
    fn try_attribute(&self, name: &str) -> Result<ColumnValue, PressError> {
        self.attribute(name)
            .ok_or_else(|| PressError::UnknownAttribute {
                model: Self::MODEL,
                attribute: name.to_string(),
            })
    }
}

/// Entities stored in the posts table; the post query extensions apply to them
pub trait PostEntity: Entity {}

/// Entities stored in the term_taxonomy table; the taxonomy query extensions apply to them
pub trait TaxonomyEntity: Entity {
    fn as_taxonomy(&self) -> &Taxonomy;
}

/// Read a WordPress datetime column
///
/// WordPress writes `0000-00-00 00:00:00` for unset dates (drafts, GMT dates of
/// scheduled posts); those read as `None`, as do missing columns and NULL.
pub(crate) fn wp_datetime(row: &Row, column: &str) -> Result<Option<NaiveDateTime>, PressError> {
    match row.value(column) {
        None | Some(ColumnValue::Null) => Ok(None),
        Some(ColumnValue::Text(s)) if s.starts_with("0000-00-00") => Ok(None),
        Some(value) => NaiveDateTime::try_from_column(value)
            .map(Some)
            .map_err(|e| PressError::ParseError(format!("column `{column}`: {e}"))),
    }
}

/// Optional column with a default for rows that do not select it
pub(crate) fn or_default<T: TryFromColumn + Default>(
    row: &Row,
    column: &str,
) -> Result<T, PressError> {
    Ok(row.get_opt::<T>(column)?.unwrap_or_default())
}
