//! Relation module for entity relationships.
//!
//! This module provides support for defining and querying entity relationships:
//! - belongs_to: Many-to-one relationship
//! - has_many: One-to-many relationship
//! - belongs_to_many: Many-to-many relationship (via a pivot table)
//!
//! # Architecture
//!
//! - **Def**: Relation definition types (`RelationDef`, `RelationType`, `Pivot`)
//!   and lazy access (`RelationDef::query_for`)
//! - **Eager**: selectinload-style batch loading keyed by parent

// Relation definitions
pub mod def;
#[doc(inline)]
pub use def::{Pivot, RelationDef, RelationType};

// Eager loading
pub mod eager;
#[doc(inline)]
pub use eager::{load_belongs_to, load_grouped, load_has_many, load_many_to_many};
