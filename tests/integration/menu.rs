//! Menus and their items.

use crate::fixtures::{ids, wordpress};
use lifepress::{Entity, Menu, MenuItem, TaxonomyBuilder};

fn titles(items: &[MenuItem]) -> Vec<&str> {
    items.iter().map(|item| item.post_title.as_str()).collect()
}

#[test]
fn test_menus_load_term_and_ordered_items() {
    let conn = wordpress();
    let menus = Menu::all(&conn).unwrap();
    let mut menu_ids = ids(&menus);
    menu_ids.sort_unstable();
    assert_eq!(menu_ids, vec![13, 15]);

    let main = menus.iter().find(|menu| menu.id() == 13).unwrap();
    assert_eq!(main.name(), Some("Main Menu"));
    assert_eq!(titles(&main.items), vec!["Blog", "Contact", "Home"]);

    let footer = menus.iter().find(|menu| menu.id() == 15).unwrap();
    assert_eq!(footer.slug(), Some("footer"));
    assert!(footer.items.is_empty());
}

#[test]
fn test_lazy_items_share_the_order() {
    let conn = wordpress();
    let main = Menu::query(&conn).slug("main-menu").one().unwrap();
    let items = main.items(&conn).all().unwrap();
    assert_eq!(ids(&items), ids(&main.items));
    assert_eq!(ids(&items), vec![8, 9, 7]);
}

#[test]
fn test_without_relations_leaves_menu_bare() {
    let conn = wordpress();
    let main = Menu::query(&conn).without_relations().slug("main-menu").one().unwrap();
    assert!(main.term.is_none());
    assert!(main.items.is_empty());
    assert_eq!(main.items(&conn).count().unwrap(), 3);
}

#[test]
fn test_menu_serializes_flat() {
    let conn = wordpress();
    let main = Menu::find(&conn, 13).unwrap().unwrap();
    let json = serde_json::to_value(&main).unwrap();
    assert_eq!(json["term_taxonomy_id"], 13);
    assert_eq!(json["taxonomy"], "nav_menu");
    assert_eq!(json["items"][0]["post_title"], "Blog");
    assert_eq!(json["items"][0]["ID"], 8);
}

#[test]
fn test_menu_item_targets() {
    let conn = wordpress();
    let blog = MenuItem::find(&conn, 8).unwrap().unwrap();
    assert_eq!(blog.object_type(&conn).unwrap().as_deref(), Some("page"));
    assert_eq!(blog.object_id(&conn).unwrap(), Some(5));
    assert_eq!(blog.url(&conn).unwrap(), None);
    assert!(blog.parent_item(&conn).unwrap().is_none());

    let contact = MenuItem::find(&conn, 9).unwrap().unwrap();
    assert_eq!(contact.object_type(&conn).unwrap().as_deref(), Some("custom"));
    assert_eq!(contact.object_id(&conn).unwrap(), None);
    assert_eq!(
        contact.url(&conn).unwrap().as_deref(),
        Some("https://example.com/contact")
    );
    let parent = contact.parent_item(&conn).unwrap().unwrap();
    assert_eq!(parent.id(), 8);

    // explicit "0" parent
    let home = MenuItem::find(&conn, 7).unwrap().unwrap();
    assert!(home.parent_item(&conn).unwrap().is_none());
}
