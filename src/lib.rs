//! # Lifepress
//!
//! Typed, fluent queries over a WordPress database schema (posts, taxonomies,
//! terms, menus) built on `sea-query`, executed through `may_postgres` or
//! `rusqlite`.
//!
//! ```no_run
//! use lifepress::{Connection, Entity, Menu, Post, PostBuilder, SqliteExecutor, TablePrefix};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let conn = Connection::new(SqliteExecutor::open("wordpress.sqlite")?, TablePrefix::new("wp_")?);
//!
//! let news = Post::query(&conn)
//!     .published()
//!     .type_("post")
//!     .taxonomy("category", "news")
//!     .all()?;
//!
//! for menu in Menu::all(&conn)? {
//!     println!("{:?}: {} item(s)", menu.name(), menu.items.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connection;
pub mod executor;
pub mod metrics;
pub mod row;

pub mod query;
pub mod relation;

pub mod builder;
pub mod model;

pub mod raw_sql;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use config::{DatabaseConfig, PressConfig};
pub use connection::{
    connect, validate_connection_string, Connection, ConnectionError, DynConnection, TablePrefix,
};
pub use executor::{Backend, PressError, PressExecutor};
#[cfg(feature = "postgres")]
pub use executor::MayPostgresExecutor;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteExecutor;
pub use row::{ColumnValue, FromRow, Row, TryFromColumn};

pub use query::{Ident, SelectQuery, SortOrder};

pub use builder::{PostBuilder, Search, TaxonomyBuilder, Terms};
pub use model::{
    Attributes, Category, Discriminator, Entity, Menu, MenuItem, Post, PostEntity, PostMeta, Tag,
    Taxonomy, TaxonomyEntity, Term, TermMeta,
};

pub use raw_sql::{
    execute_statement, execute_unprepared, find_all_by_statement, find_by_statement,
    find_models_by_statement, query_value,
};
