//! Domain query extensions.
//!
//! [`PostBuilder`] and [`TaxonomyBuilder`] add WordPress-specific filters to
//! [`SelectQuery`](crate::SelectQuery) for the entities they apply to. Bring
//! the trait into scope to use them:
//!
//! ```no_run
//! use lifepress::{Connection, Entity, Post, PostBuilder, SqliteExecutor, TablePrefix};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let conn = Connection::new(SqliteExecutor::open_in_memory()?, TablePrefix::default());
//! let drafts = Post::query(&conn).status("draft").all()?;
//! # Ok(())
//! # }
//! ```

pub mod post;
pub mod taxonomy;

#[doc(inline)]
pub use post::{PostBuilder, Search, Terms};
#[doc(inline)]
pub use taxonomy::TaxonomyBuilder;
