//! Query building and execution for WordPress entities.
//!
//! This module provides the query builder API every model shares. It includes
//! the `SelectQuery` builder, its execution methods, and the conversion of
//! SeaQuery values into driver parameters.
//!
//! # Architecture
//!
//! - **Select**: SELECT query builder (`SelectQuery`) and runtime identifiers (`Ident`)
//! - **Execution**: Query execution methods (`all`, `one`, `find_one`, `first`, `count`)
//! - **Order**: Sort direction accepted by the fluent builders (`SortOrder`)
//! - **Value Conversion**: SeaQuery Value to driver parameter conversion
//!
//! # Examples
//!
//! ```no_run
//! use lifepress::{Connection, Entity, Post, SqliteExecutor, TablePrefix};
//! use sea_query::{Expr, ExprTrait};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let conn = Connection::new(SqliteExecutor::open("blog.sqlite")?, TablePrefix::default());
//!
//! // Find all posts
//! let posts = Post::query(&conn).all()?;
//!
//! // Find posts with filters
//! let query = Post::query(&conn);
//! let comments = query.col("comment_count");
//! let discussed = query.filter(Expr::col(comments).gt(10)).all()?;
//! # Ok(())
//! # }
//! ```

pub(crate) mod value_conversion;

pub mod select;
#[doc(inline)]
pub use select::{Ident, SelectQuery};

pub mod execution;

pub mod order;
#[doc(inline)]
pub use order::SortOrder;
