//! Post and term relations, execution helpers and connection setup.

use crate::fixtures::{ids, wordpress};
use lifepress::{
    DynConnection, Entity, Post, PostBuilder, PostMeta, PressConfig, PressError, Taxonomy, Term,
};

#[test]
fn test_post_meta() {
    let conn = wordpress();
    let hello = Post::find(&conn, 1).unwrap().unwrap();

    let meta = hello.meta(&conn).all().unwrap();
    assert_eq!(meta.len(), 2);
    assert!(meta.iter().all(|row| row.post_id == 1));

    assert_eq!(hello.meta_value(&conn, "rank").unwrap().as_deref(), Some("10"));
    assert_eq!(hello.meta_value(&conn, "missing").unwrap(), None);
}

#[test]
fn test_meta_belongs_to_post() {
    let conn = wordpress();
    let meta = PostMeta::find(&conn, 3).unwrap().unwrap();
    assert_eq!(meta.meta_key, "rank");
    let post = meta.post(&conn).one().unwrap();
    assert_eq!(post.post_title, "Rust Tips");
}

#[test]
fn test_parent_and_children() {
    let conn = wordpress();
    let team = Post::find(&conn, 6).unwrap().unwrap();
    let about = team.parent(&conn).one().unwrap();
    assert_eq!(about.id, 5);
    assert_eq!(ids(&about.children(&conn).all().unwrap()), vec![6]);

    assert!(about.parent(&conn).first().unwrap().is_none());
}

#[test]
fn test_post_taxonomies_load_terms() {
    let conn = wordpress();
    let tips = Post::find(&conn, 10).unwrap().unwrap();
    let mut taxonomies: Vec<Taxonomy> = tips.taxonomies(&conn).all().unwrap();
    taxonomies.sort_by_key(|taxonomy| taxonomy.term_taxonomy_id);

    assert_eq!(ids(&taxonomies), vec![12, 14]);
    assert_eq!(taxonomies[0].slug(), Some("news"));
    assert_eq!(taxonomies[1].taxonomy, "post_tag");
    assert_eq!(taxonomies[1].name(), Some("Rust"));
}

#[test]
fn test_term_meta() {
    let conn = wordpress();
    let news = Term::find(&conn, 2).unwrap().unwrap();
    let meta = news.meta(&conn).one().unwrap();
    assert_eq!(meta.term_id, 2);
    assert_eq!(meta.meta_value.as_deref(), Some("blue"));
    assert!(!Term::find(&conn, 1).unwrap().unwrap().meta(&conn).exists().unwrap());
}

#[test]
fn test_execution_helpers() {
    let conn = wordpress();
    let posts = Post::query(&conn).type_("post");
    assert_eq!(posts.count().unwrap(), 5);
    assert!(posts.exists().unwrap());

    let err = Post::query(&conn).type_("post").find_one().unwrap_err();
    assert!(matches!(err, PressError::QueryError(_)));

    let err = Post::query(&conn).slug("nope").one().unwrap_err();
    assert!(err.to_string().contains("no Post found"));

    assert!(Post::query(&conn).slug("nope").find_one().unwrap().is_none());

    let page = Post::query(&conn).type_("page").limit(1).offset(1).all().unwrap();
    assert_eq!(page.len(), 1);
}

#[test]
fn test_dyn_connection_from_config() {
    let config = PressConfig::from_toml(
        r#"
        [database]
        url = "sqlite::memory:"
        table_prefix = "wp_"
        "#,
    )
    .unwrap();
    let conn = DynConnection::from_config(&config).unwrap();
    assert_eq!(conn.prefix().as_str(), "wp_");
    assert_eq!(conn.table("posts"), "wp_posts");
}

#[test]
fn test_invalid_prefix_is_rejected() {
    let config = PressConfig::from_toml(
        r#"
        [database]
        url = "sqlite::memory:"
        table_prefix = "wp_; DROP TABLE"
        "#,
    )
    .unwrap();
    assert!(DynConnection::from_config(&config).is_err());
}
