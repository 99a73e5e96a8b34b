//! PostBuilder filters executed against seeded data.

use crate::fixtures::{ids, wordpress};
use chrono::NaiveDate;
use lifepress::model::PostColumn;
use lifepress::{Entity, MenuItem, Post, PostBuilder, SortOrder};

fn june_2024() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .and_then(|day| day.and_hms_opt(12, 0, 0))
        .unwrap()
}

// ============================================================================
// Status and publication
// ============================================================================

#[test]
fn test_status_filters() {
    let conn = wordpress();
    let drafts = Post::query(&conn).status("draft").all().unwrap();
    assert_eq!(ids(&drafts), vec![4]);
    assert_eq!(drafts[0].post_date, None);
}

#[test]
fn test_published_at_includes_due_scheduled_posts() {
    let conn = wordpress();
    let query = Post::query(&conn);
    let id = query.col(PostColumn::Id);
    let posts = query
        .type_("post")
        .published_at(june_2024())
        .order_by(id, sea_query::Order::Asc)
        .all()
        .unwrap();
    assert_eq!(ids(&posts), vec![1, 2, 10]);
    assert!(posts.iter().all(|post| post.is_published_at(june_2024())));
}

#[test]
fn test_published_uses_the_clock() {
    let conn = wordpress();
    let published = ids(&Post::query(&conn).type_("post").published().all().unwrap());
    assert!(published.contains(&2));
    assert!(!published.contains(&3));
    assert!(!published.contains(&4));
}

// ============================================================================
// Type, slug, parent
// ============================================================================

#[test]
fn test_type_and_type_in() {
    let conn = wordpress();
    assert_eq!(Post::query(&conn).type_("page").count().unwrap(), 2);
    assert_eq!(
        Post::query(&conn).type_in(["page", "nav_menu_item"]).count().unwrap(),
        5
    );
    assert_eq!(Post::query(&conn).type_in(Vec::<String>::new()).count().unwrap(), 0);
}

#[test]
fn test_slug_and_parent() {
    let conn = wordpress();
    let about = Post::query(&conn).slug("about").one().unwrap();
    assert_eq!(about.id, 5);

    let children = Post::query(&conn).parent(about.id).all().unwrap();
    assert_eq!(ids(&children), vec![6]);
}

// ============================================================================
// Taxonomy
// ============================================================================

#[test]
fn test_taxonomy_single_slug() {
    let conn = wordpress();
    let query = Post::query(&conn);
    let id = query.col(PostColumn::Id);
    let news = query
        .taxonomy("category", "news")
        .order_by(id, sea_query::Order::Asc)
        .all()
        .unwrap();
    assert_eq!(ids(&news), vec![1, 10]);
}

#[test]
fn test_taxonomy_slug_list() {
    let conn = wordpress();
    let count = Post::query(&conn)
        .taxonomy("category", ["news", "uncategorized"])
        .count()
        .unwrap();
    assert_eq!(count, 3);
}

#[test]
fn test_taxonomy_requires_matching_taxonomy_name() {
    let conn = wordpress();
    assert!(!Post::query(&conn).taxonomy("post_tag", "news").exists().unwrap());
    assert_eq!(
        ids(&Post::query(&conn).taxonomy("post_tag", "rust").all().unwrap()),
        vec![10]
    );
    assert!(!Post::query(&conn)
        .taxonomy("category", Vec::<String>::new())
        .exists()
        .unwrap());
}

// ============================================================================
// Search
// ============================================================================

#[test]
fn test_search_is_case_insensitive() {
    let conn = wordpress();
    let found = Post::query(&conn).search("OWNERSHIP").all().unwrap();
    assert_eq!(ids(&found), vec![10]);

    let found = Post::query(&conn).search(["welcome", "launch"]).count().unwrap();
    assert_eq!(found, 2);
}

#[test]
fn test_search_composes_with_status() {
    let conn = wordpress();
    // "hello" is in post 1 (publish) and post 4 (draft)
    assert_eq!(Post::query(&conn).search("hello").count().unwrap(), 2);
    let published = Post::query(&conn).status("publish").search("hello").all().unwrap();
    assert_eq!(ids(&published), vec![1]);
}

#[test]
fn test_blank_search_keeps_every_row() {
    let conn = wordpress();
    let total = Post::query(&conn).count().unwrap();
    assert_eq!(Post::query(&conn).search("").count().unwrap(), total);
    assert_eq!(Post::query(&conn).search("  %% ").count().unwrap(), total);
    assert_eq!(Post::query(&conn).search(Vec::<&str>::new()).count().unwrap(), total);
}

// ============================================================================
// Meta ordering
// ============================================================================

#[test]
fn test_order_by_meta_sorts_numeric_strings() {
    let conn = wordpress();
    let asc = Post::query(&conn)
        .where_in(PostColumn::Id, [1_i64, 2, 10])
        .order_by_meta("rank", SortOrder::Asc)
        .all()
        .unwrap();
    assert_eq!(ids(&asc), vec![2, 10, 1]);
    assert_eq!(asc[0].meta_ordering.as_deref(), Some("7"));
    assert_eq!(asc[2].meta_ordering.as_deref(), Some("10"));

    let desc = Post::query(&conn)
        .where_in(PostColumn::Id, [1_i64, 2, 10])
        .order_by_meta("rank", "desc".parse().unwrap())
        .all()
        .unwrap();
    assert_eq!(ids(&desc), vec![10, 2, 1]);
}

#[test]
fn test_order_by_meta_without_values_keeps_rows() {
    let conn = wordpress();
    let pages = Post::query(&conn)
        .type_("page")
        .order_by_meta("rank", SortOrder::Asc)
        .all()
        .unwrap();
    assert_eq!(pages.len(), 2);
    assert!(pages.iter().all(|page| page.meta_ordering.is_none()));
}

// ============================================================================
// Ids
// ============================================================================

#[test]
fn test_where_ids_keeps_given_order() {
    let conn = wordpress();
    let posts = Post::query(&conn).where_ids([5, 3, 8]).all().unwrap();
    assert_eq!(ids(&posts), vec![5, 3, 8]);
}

#[test]
fn test_where_ids_edge_cases() {
    let conn = wordpress();
    assert!(Post::query(&conn).where_ids(Vec::new()).all().unwrap().is_empty());
    assert_eq!(ids(&Post::query(&conn).where_ids([99, 1]).all().unwrap()), vec![1]);
}

#[test]
#[allow(deprecated)]
fn test_ids_alias() {
    let conn = wordpress();
    assert_eq!(ids(&Post::query(&conn).ids([10, 1]).all().unwrap()), vec![10, 1]);
}

// ============================================================================
// Menu items share the builder
// ============================================================================

#[test]
fn test_menu_items_are_scoped_posts() {
    let conn = wordpress();
    let mut items = ids(&MenuItem::all(&conn).unwrap());
    items.sort_unstable();
    assert_eq!(items, vec![7, 8, 9]);

    assert!(MenuItem::find(&conn, 1).unwrap().is_none());
    let contact = MenuItem::query(&conn).slug("contact").one().unwrap();
    assert_eq!(contact.post_title, "Contact");
}
