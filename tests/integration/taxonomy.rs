//! Taxonomy scoping, term fallthrough and taxonomy relations.

use crate::fixtures::{ids, wordpress, wordpress_with_prefix};
use lifepress::model::TaxonomyColumn;
use sea_query::ExprTrait;
use lifepress::{
    Attributes, Category, ColumnValue, Entity, Menu, PressError, Tag, Taxonomy, TaxonomyBuilder,
};

#[test]
fn test_typed_taxonomies_are_scoped() {
    let conn = wordpress();

    let mut categories = ids(&Category::all(&conn).unwrap());
    categories.sort_unstable();
    assert_eq!(categories, vec![11, 12]);

    assert_eq!(ids(&Tag::all(&conn).unwrap()), vec![14]);
    assert!(Category::find(&conn, 13).unwrap().is_none());
    assert_eq!(Taxonomy::query(&conn).count().unwrap(), 5);
}

#[test]
fn test_term_is_eager_loaded() {
    let conn = wordpress();
    let news = Category::find(&conn, 12).unwrap().unwrap();
    assert_eq!(news.name(), Some("News"));
    assert_eq!(news.slug(), Some("news"));
    assert_eq!(news.term.as_ref().map(|term| term.term_id), Some(2));
}

#[test]
fn test_without_relations_skips_term() {
    let conn = wordpress();
    let news = Category::query(&conn)
        .without_relations()
        .slug("news")
        .one()
        .unwrap();
    assert!(news.term.is_none());
    assert_eq!(news.name(), None);
}

#[test]
fn test_attributes_fall_through_to_term() {
    let conn = wordpress();
    let news = Category::find(&conn, 12).unwrap().unwrap();

    assert_eq!(news.attribute("slug"), Some(ColumnValue::from("news")));
    assert_eq!(news.attribute("name"), Some(ColumnValue::from("News")));
    assert_eq!(news.attribute("term_group"), Some(ColumnValue::Int(0)));
    // own column wins over the term
    assert_eq!(
        news.attribute("description"),
        Some(ColumnValue::from("Latest news"))
    );
    assert_eq!(news.attribute("term_id"), Some(ColumnValue::Int(2)));

    match news.try_attribute("colour") {
        Err(PressError::UnknownAttribute { model, attribute }) => {
            assert_eq!(model, "Category");
            assert_eq!(attribute, "colour");
        }
        other => panic!("expected UnknownAttribute, got {other:?}"),
    }
}

#[test]
fn test_unloaded_term_has_no_fallthrough() {
    let conn = wordpress();
    let news = Taxonomy::query(&conn)
        .without_relations()
        .category()
        .term("news")
        .one()
        .unwrap();
    assert_eq!(news.attribute("slug"), None);
    assert!(news.try_attribute("slug").is_err());
}

#[test]
fn test_meta_is_keyed_by_term_id() {
    let conn = wordpress();
    let news = Category::find(&conn, 12).unwrap().unwrap();
    let meta = news.meta(&conn).all().unwrap();
    assert_eq!(meta.len(), 1);
    assert_eq!(meta[0].meta_key, "color");
    assert_eq!(meta[0].meta_value.as_deref(), Some("blue"));

    let term = news.term(&conn).one().unwrap();
    assert_eq!(term.meta(&conn).count().unwrap(), 1);
}

#[test]
fn test_parent_taxonomy() {
    let conn = wordpress();
    let news = Category::find(&conn, 12).unwrap().unwrap();
    let parent = news.parent(&conn).one().unwrap();
    assert_eq!(parent.term_taxonomy_id, 11);
    assert_eq!(parent.slug(), Some("uncategorized"));

    let root = Category::find(&conn, 11).unwrap().unwrap();
    assert!(root.parent(&conn).first().unwrap().is_none());
}

#[test]
fn test_posts_of_a_taxonomy() {
    let conn = wordpress();
    let news = Category::find(&conn, 12).unwrap().unwrap();
    let mut posts = ids(&news.posts(&conn).all().unwrap());
    posts.sort_unstable();
    assert_eq!(posts, vec![1, 10]);
}

#[test]
fn test_taxonomy_builder() {
    let conn = wordpress();

    let tags = Taxonomy::query(&conn).name("post_tag").all().unwrap();
    assert_eq!(ids(&tags), vec![14]);

    let footer = Taxonomy::query(&conn).menu().term("footer").one().unwrap();
    assert_eq!(footer.term_taxonomy_id, 15);

    // a typed taxonomy can be narrowed but never widened
    assert!(!Category::query(&conn).name("nav_menu").exists().unwrap());
    assert!(!Menu::query(&conn).slug("news").exists().unwrap());

    let query = Taxonomy::query(&conn);
    let column = query.col(TaxonomyColumn::Taxonomy);
    assert_eq!(
        query
            .filter(sea_query::Expr::col(column).eq("category"))
            .slug("")
            .count()
            .unwrap(),
        2
    );
}

#[test]
fn test_custom_prefix() {
    let conn = wordpress_with_prefix("blog2_");
    assert_eq!(Category::query(&conn).count().unwrap(), 2);
    let rust = Tag::query(&conn).slug("rust").one().unwrap();
    assert_eq!(rust.name(), Some("Rust"));
}
