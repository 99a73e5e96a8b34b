//! WordPress schema and seed data shared by the integration tests.
//!
//! Term taxonomy ids (11..15) deliberately differ from term ids (1..5) so that
//! a relation keyed on the wrong column finds nothing.

use lifepress::{execute_unprepared, Connection, SqliteExecutor, TablePrefix};

// ============================================================================
// Schema
// ============================================================================

const SCHEMA: &str = r"
CREATE TABLE {p}posts (
    ID INTEGER PRIMARY KEY,
    post_author INTEGER NOT NULL DEFAULT 0,
    post_date TEXT NOT NULL DEFAULT '0000-00-00 00:00:00',
    post_date_gmt TEXT NOT NULL DEFAULT '0000-00-00 00:00:00',
    post_content TEXT NOT NULL DEFAULT '',
    post_title TEXT NOT NULL DEFAULT '',
    post_excerpt TEXT NOT NULL DEFAULT '',
    post_status TEXT NOT NULL DEFAULT 'publish',
    comment_status TEXT NOT NULL DEFAULT 'open',
    post_name TEXT NOT NULL DEFAULT '',
    post_modified TEXT NOT NULL DEFAULT '0000-00-00 00:00:00',
    post_parent INTEGER NOT NULL DEFAULT 0,
    guid TEXT NOT NULL DEFAULT '',
    menu_order INTEGER NOT NULL DEFAULT 0,
    post_type TEXT NOT NULL DEFAULT 'post',
    post_mime_type TEXT NOT NULL DEFAULT '',
    comment_count INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE {p}postmeta (
    meta_id INTEGER PRIMARY KEY,
    post_id INTEGER NOT NULL DEFAULT 0,
    meta_key TEXT,
    meta_value TEXT
);
CREATE TABLE {p}terms (
    term_id INTEGER PRIMARY KEY,
    name TEXT NOT NULL DEFAULT '',
    slug TEXT NOT NULL DEFAULT '',
    term_group INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE {p}termmeta (
    meta_id INTEGER PRIMARY KEY,
    term_id INTEGER NOT NULL DEFAULT 0,
    meta_key TEXT,
    meta_value TEXT
);
CREATE TABLE {p}term_taxonomy (
    term_taxonomy_id INTEGER PRIMARY KEY,
    term_id INTEGER NOT NULL DEFAULT 0,
    taxonomy TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT '',
    parent INTEGER NOT NULL DEFAULT 0,
    count INTEGER NOT NULL DEFAULT 0
);
CREATE TABLE {p}term_relationships (
    object_id INTEGER NOT NULL DEFAULT 0,
    term_taxonomy_id INTEGER NOT NULL DEFAULT 0,
    term_order INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (object_id, term_taxonomy_id)
);
";

// ============================================================================
// Seed data
// ============================================================================

const SEED: &str = r"
INSERT INTO {p}posts (ID, post_title, post_name, post_content, post_status, post_type, post_date, post_parent, menu_order) VALUES
    (1, 'Hello World', 'hello-world', 'Welcome to WordPress. This is your first post.', 'publish', 'post', '2024-01-01 10:00:00', 0, 0),
    (2, 'Scheduled Launch', 'scheduled-launch', 'The launch went out on schedule.', 'future', 'post', '2000-01-01 09:00:00', 0, 0),
    (3, 'Next Millennium', 'next-millennium', 'Not yet.', 'future', 'post', '2999-01-01 09:00:00', 0, 0),
    (4, 'Draft Notes', 'draft-notes', 'Hello from the drafts folder.', 'draft', 'post', '0000-00-00 00:00:00', 0, 0),
    (5, 'About', 'about', 'About this site.', 'publish', 'page', '2023-05-01 08:00:00', 0, 0),
    (6, 'Team', 'team', 'The people behind it.', 'publish', 'page', '2023-05-02 08:00:00', 5, 0),
    (7, 'Home', 'home', '', 'publish', 'nav_menu_item', '2023-06-01 08:00:00', 0, 3),
    (8, 'Blog', 'blog', '', 'publish', 'nav_menu_item', '2023-06-01 08:00:00', 0, 1),
    (9, 'Contact', 'contact', '', 'publish', 'nav_menu_item', '2023-06-01 08:00:00', 0, 2),
    (10, 'Rust Tips', 'rust-tips', 'Ownership and borrowing explained.', 'publish', 'post', '2024-02-01 10:00:00', 0, 0);

UPDATE {p}posts SET post_excerpt = 'A short ownership primer' WHERE ID = 10;

INSERT INTO {p}postmeta (meta_id, post_id, meta_key, meta_value) VALUES
    (1, 1, 'rank', '10'),
    (2, 2, 'rank', '7'),
    (3, 10, 'rank', '9'),
    (4, 1, '_edit_lock', '1700000000:1'),
    (5, 8, '_menu_item_object', 'page'),
    (6, 8, '_menu_item_object_id', '5'),
    (7, 9, '_menu_item_object', 'custom'),
    (8, 9, '_menu_item_url', 'https://example.com/contact'),
    (9, 9, '_menu_item_menu_item_parent', '8'),
    (10, 7, '_menu_item_menu_item_parent', '0');

INSERT INTO {p}terms (term_id, name, slug) VALUES
    (1, 'Uncategorized', 'uncategorized'),
    (2, 'News', 'news'),
    (3, 'Main Menu', 'main-menu'),
    (4, 'Rust', 'rust'),
    (5, 'Footer', 'footer');

INSERT INTO {p}termmeta (meta_id, term_id, meta_key, meta_value) VALUES
    (1, 2, 'color', 'blue');

INSERT INTO {p}term_taxonomy (term_taxonomy_id, term_id, taxonomy, description, parent, count) VALUES
    (11, 1, 'category', '', 0, 1),
    (12, 2, 'category', 'Latest news', 11, 2),
    (13, 3, 'nav_menu', '', 0, 3),
    (14, 4, 'post_tag', '', 0, 1),
    (15, 5, 'nav_menu', '', 0, 0);

INSERT INTO {p}term_relationships (object_id, term_taxonomy_id) VALUES
    (1, 12),
    (10, 12),
    (10, 14),
    (2, 11),
    (7, 13),
    (8, 13),
    (9, 13);
";

/// In-memory WordPress database with the default `wp_` prefix
pub fn wordpress() -> Connection<SqliteExecutor> {
    wordpress_with_prefix("wp_")
}

/// In-memory WordPress database whose tables use `prefix`
pub fn wordpress_with_prefix(prefix: &str) -> Connection<SqliteExecutor> {
    let executor = SqliteExecutor::open_in_memory().expect("open in-memory sqlite");
    let script = format!("{SCHEMA}{SEED}").replace("{p}", prefix);
    execute_unprepared(&executor, &script).expect("seed wordpress schema");
    Connection::new(executor, TablePrefix::new(prefix).expect("valid prefix"))
}

/// Ids of a result set, in result order
pub fn ids<T: lifepress::Entity>(models: &[T]) -> Vec<i64> {
    models.iter().map(lifepress::Entity::id).collect()
}
