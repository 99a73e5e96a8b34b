//! Integration tests against an in-memory SQLite WordPress database.

mod fixtures;

mod menu;
mod post_builder;
mod relations;
mod taxonomy;
